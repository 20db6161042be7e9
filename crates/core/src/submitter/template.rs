//! Placeholder substitution for ticket title, subject and body.

/// Values available to ticket templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub client_name: &'a str,
    /// Run date, `YYYY-MM-DD`.
    pub date: &'a str,
    /// Comma separated attachment file names.
    pub files_list: &'a str,
}

impl TemplateContext<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "client_name" => Some(self.client_name),
            "date" => Some(self.date),
            "files_list" => Some(self.files_list),
            _ => None,
        }
    }
}

/// Replaces `{client_name}`, `{date}` and `{files_list}` in one pass.
/// Unknown `{...}` sequences are kept verbatim, and substituted values are
/// never expanded again.
pub fn render(template: &str, ctx: &TemplateContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let replaced = tail[1..]
            .find('}')
            .and_then(|end| ctx.lookup(&tail[1..=end]).map(|value| (value, end + 2)));

        match replaced {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: TemplateContext<'static> = TemplateContext {
        client_name: "Acme",
        date: "2026-10-18",
        files_list: "a.pdf, b.csv",
    };

    #[test]
    fn test_render_all_placeholders() {
        let out = render("{client_name} sent {files_list} on {date}", &CTX);
        assert_eq!(out, "Acme sent a.pdf, b.csv on 2026-10-18");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        assert_eq!(render("{date}/{date}", &CTX), "2026-10-18/2026-10-18");
    }

    #[test]
    fn test_render_keeps_unknown_and_unbalanced_braces() {
        assert_eq!(render("{unknown} {date", &CTX), "{unknown} {date");
        assert_eq!(render("{{date}}", &CTX), "{2026-10-18}");
    }

    #[test]
    fn test_render_does_not_expand_values() {
        let ctx = TemplateContext {
            client_name: "{date}",
            ..CTX
        };
        assert_eq!(render("{client_name}", &ctx), "{date}");
    }
}
