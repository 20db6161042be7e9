//! Intake pipeline implementation.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::archiver::{ensure_folder, list_entries, move_files, reset_scratch};
use crate::config::{validate_folders, Config};
use crate::contact::resolve_main_contact;
use crate::extractor::extract_archive_async;
use crate::grouper::{group_by_client, ClientGroup};
use crate::helpdesk::HelpdeskApi;
use crate::scanner::scan_archives;
use crate::submitter::{post_internal_note, submit_ticket};

use super::types::{ClientOutcome, ClientReport, ClientState, PipelineError, RunSummary};

/// Runs one pass over the source folder.
pub struct IntakePipeline<'a, H: HelpdeskApi + ?Sized> {
    config: &'a Config,
    api: &'a H,
    run_date: NaiveDate,
}

impl<'a, H: HelpdeskApi + ?Sized> IntakePipeline<'a, H> {
    /// `run_date` is rendered into ticket templates as `{date}`.
    pub fn new(config: &'a Config, api: &'a H, run_date: NaiveDate) -> Self {
        Self {
            config,
            api,
            run_date,
        }
    }

    /// Processes every client group found in the source folder.
    ///
    /// Only setup problems (an unsafe folder layout, folders that cannot be
    /// created, an unreadable source folder, a scratch folder that cannot be
    /// reset) end the run with an error. Per-client failures are reported
    /// in the summary.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let folders = &self.config.folders;

        // The scratch folder is wiped below; never let that reach the inputs.
        validate_folders(folders).map_err(PipelineError::Layout)?;

        ensure_folder(&folders.processed)
            .await
            .map_err(PipelineError::Setup)?;
        reset_scratch(&folders.scratch)
            .await
            .map_err(PipelineError::Setup)?;

        let archives = scan_archives(&folders.source, &folders.archive_extension).await?;
        let mut summary = RunSummary {
            archives_found: archives.len(),
            clients: Vec::new(),
        };

        if archives.is_empty() {
            info!("No ZIP files found in {}", folders.source.display());
            return Ok(summary);
        }

        let groups = group_by_client(archives.iter().map(|a| a.name.as_str()));
        if groups.is_empty() {
            info!("No valid client-tagged files found");
            return Ok(summary);
        }

        info!(
            "Found {} archive(s) for {} client(s)",
            archives.len(),
            groups.len()
        );

        for group in groups {
            let outcome = self.process_client(&group).await;
            info!("Client '{}' finished: {}", group.client, outcome.state());

            reset_scratch(&folders.scratch)
                .await
                .map_err(|source| PipelineError::ScratchReset {
                    client: group.client.clone(),
                    source,
                })?;

            summary.clients.push(ClientReport {
                client: group.client,
                archives: group.archives,
                outcome,
            });
        }

        Ok(summary)
    }

    /// Drives one client from extraction to archiving. Expects an empty
    /// scratch folder and leaves cleanup of it to the caller.
    pub async fn process_client(&self, group: &ClientGroup) -> ClientOutcome {
        let client = group.client.as_str();
        let folders = &self.config.folders;
        transition(client, ClientState::Pending);

        transition(client, ClientState::Extracting);
        let files = self.extract_group(group).await;

        transition(client, ClientState::Resolving);
        let contact = match resolve_main_contact(self.api, client).await {
            Ok(contact) => contact,
            Err(e) => {
                error!(
                    "Ticket for '{}' not created because main contact has no email or could not be found",
                    client
                );
                transition(client, ClientState::SkippedNoContact);
                return ClientOutcome::SkippedNoContact {
                    reason: e.to_string(),
                };
            }
        };

        transition(client, ClientState::Submitting);
        let ticket_id = match submit_ticket(
            self.api,
            &self.config.ticket,
            client,
            &contact,
            &files,
            self.run_date,
        )
        .await
        {
            Ok(id) => id,
            Err(e) => {
                transition(client, ClientState::SkippedTicketFailed);
                return ClientOutcome::SkippedTicketFailed {
                    reason: e.to_string(),
                }
            }
        };

        transition(client, ClientState::Annotating);
        let note_posted = post_internal_note(self.api, ticket_id, &self.config.note)
            .await
            .is_ok();

        transition(client, ClientState::Archiving);
        if let Err(e) = ensure_folder(&folders.processed).await {
            error!("Processed folder unavailable for '{}': {}", client, e);
        }
        let originals = move_files(
            group.archives.as_slice(),
            &folders.source,
            &folders.processed,
        )
        .await;
        let extracted = match list_entries(&folders.scratch).await {
            Ok(names) => {
                move_files(names.as_slice(), &folders.scratch, &folders.processed).await
            }
            Err(e) => {
                error!("Extracted files of '{}' were not archived: {}", client, e);
                Default::default()
            }
        };

        transition(client, ClientState::Done);
        ClientOutcome::Done {
            ticket_id,
            attachments: files.len(),
            note_posted,
            files_moved: originals.moved.len() + extracted.moved.len(),
            move_failures: originals.failed.len() + extracted.failed.len(),
        }
    }

    /// Unpacks every archive of the group into the scratch folder. A bad
    /// archive is logged and contributes no files.
    async fn extract_group(&self, group: &ClientGroup) -> Vec<PathBuf> {
        let folders = &self.config.folders;
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for name in &group.archives {
            let archive = folders.source.join(name);
            match extract_archive_async(archive, folders.scratch.clone()).await {
                Ok(listing) => {
                    files.extend(listing.into_iter().filter(|f| seen.insert(f.clone())));
                }
                Err(e) => warn!("Failed to unzip file for '{}': {}", group.client, e),
            }
        }

        debug!("{} file(s) to attach for '{}'", files.len(), group.client);
        files
    }
}

fn transition(client: &str, state: ClientState) {
    debug!("Client '{}' -> {}", client, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockHelpdesk};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = fixtures::config(dir.path().to_path_buf());
        std::fs::create_dir_all(&config.folders.source).unwrap();
        std::fs::create_dir_all(&config.folders.processed).unwrap();
        (dir, config)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[tokio::test]
    async fn test_run_with_empty_source_folder() {
        let (_dir, config) = setup();
        let api = MockHelpdesk::new();

        let summary = IntakePipeline::new(&config, &api, date()).run().await.unwrap();
        assert_eq!(summary, RunSummary::default());
        assert!(config.folders.processed.is_dir());
        assert!(config.folders.scratch.is_dir());
        assert!(api.recorded_searches().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_with_only_untagged_archives() {
        let (_dir, config) = setup();
        fixtures::write_zip(&config.folders.source.join("loose.zip"), &[("a.txt", "a")]);
        let api = MockHelpdesk::new();

        let summary = IntakePipeline::new(&config, &api, date()).run().await.unwrap();
        assert_eq!(summary.archives_found, 1);
        assert!(summary.clients.is_empty());
        assert!(config.folders.source.join("loose.zip").exists());
    }

    #[tokio::test]
    async fn test_run_wipes_stale_scratch_contents() {
        let (_dir, config) = setup();
        std::fs::create_dir_all(&config.folders.scratch).unwrap();
        std::fs::write(config.folders.scratch.join("stale.pdf"), b"old").unwrap();
        fixtures::write_zip(&config.folders.source.join("[Acme]a.zip"), &[("new.pdf", "new")]);

        let api = MockHelpdesk::new();
        api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)])
            .await;

        IntakePipeline::new(&config, &api, date()).run().await.unwrap();

        let tickets = api.recorded_tickets().await;
        let names: Vec<_> = tickets[0]
            .ticket
            .article
            .attachments
            .iter()
            .map(|a| a.filename.clone())
            .collect();
        assert_eq!(names, vec!["new.pdf".to_string()]);
        assert!(!config.folders.processed.join("stale.pdf").exists());
    }

    #[tokio::test]
    async fn test_nested_source_in_scratch_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut config = fixtures::config(dir.path().to_path_buf());
        config.folders.scratch = dir.path().join("work");
        config.folders.source = dir.path().join("work/incoming");
        std::fs::create_dir_all(&config.folders.source).unwrap();
        fixtures::write_zip(&config.folders.source.join("[Acme]a.zip"), &[("one.pdf", "1")]);
        let api = MockHelpdesk::new();

        let result = IntakePipeline::new(&config, &api, date()).run().await;

        assert!(matches!(result, Err(PipelineError::Layout(_))));
        assert!(config.folders.source.join("[Acme]a.zip").exists());
        assert!(api.recorded_searches().await.is_empty());
    }

    #[tokio::test]
    async fn test_process_client_deduplicates_cumulative_listing() {
        let (_dir, config) = setup();
        std::fs::create_dir_all(&config.folders.scratch).unwrap();
        fixtures::write_zip(&config.folders.source.join("[Acme]a.zip"), &[("one.pdf", "1")]);
        fixtures::write_zip(&config.folders.source.join("[Acme]b.zip"), &[("two.csv", "2")]);

        let api = MockHelpdesk::new();
        api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)])
            .await;

        let group = ClientGroup {
            client: "Acme".to_string(),
            archives: vec!["[Acme]a.zip".to_string(), "[Acme]b.zip".to_string()],
        };
        let outcome = IntakePipeline::new(&config, &api, date())
            .process_client(&group)
            .await;

        assert!(matches!(
            outcome,
            ClientOutcome::Done {
                attachments: 2,
                files_moved: 4,
                move_failures: 0,
                note_posted: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_process_client_creates_missing_processed_folder() {
        let dir = TempDir::new().unwrap();
        let config = fixtures::config(dir.path().to_path_buf());
        std::fs::create_dir_all(&config.folders.source).unwrap();
        std::fs::create_dir_all(&config.folders.scratch).unwrap();
        fixtures::write_zip(&config.folders.source.join("[Acme]a.zip"), &[("one.pdf", "1")]);
        assert!(!config.folders.processed.exists());

        let api = MockHelpdesk::new();
        api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)])
            .await;

        let group = ClientGroup {
            client: "Acme".to_string(),
            archives: vec!["[Acme]a.zip".to_string()],
        };
        let outcome = IntakePipeline::new(&config, &api, date())
            .process_client(&group)
            .await;

        assert!(matches!(
            outcome,
            ClientOutcome::Done {
                files_moved: 2,
                move_failures: 0,
                ..
            }
        ));
        assert!(config.folders.processed.join("[Acme]a.zip").exists());
        assert!(config.folders.processed.join("one.pdf").exists());
    }

    #[tokio::test]
    async fn test_ticket_failure_keeps_archives() {
        let (_dir, config) = setup();
        fixtures::write_zip(&config.folders.source.join("[Acme]a.zip"), &[("one.pdf", "1")]);

        let api = MockHelpdesk::new();
        api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)])
            .await;
        api.set_next_ticket_error(crate::helpdesk::HelpdeskError::ApiError {
            status: 500,
            body: "internal error".to_string(),
        })
        .await;

        let summary = IntakePipeline::new(&config, &api, date()).run().await.unwrap();

        assert_eq!(
            summary.clients[0].outcome.state(),
            ClientState::SkippedTicketFailed
        );
        assert!(config.folders.source.join("[Acme]a.zip").exists());
        assert!(list_entries(&config.folders.scratch).await.unwrap().is_empty());
        assert!(api.recorded_articles().await.is_empty());
    }

    #[tokio::test]
    async fn test_note_failure_still_archives() {
        let (_dir, config) = setup();
        fixtures::write_zip(&config.folders.source.join("[Acme]a.zip"), &[("one.pdf", "1")]);

        let api = MockHelpdesk::new();
        api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)])
            .await;
        api.set_next_article_error(crate::helpdesk::HelpdeskError::ApiError {
            status: 403,
            body: "forbidden".to_string(),
        })
        .await;

        let summary = IntakePipeline::new(&config, &api, date()).run().await.unwrap();

        assert!(matches!(
            summary.clients[0].outcome,
            ClientOutcome::Done {
                note_posted: false,
                ..
            }
        ));
        assert!(config.folders.processed.join("[Acme]a.zip").exists());
        assert!(config.folders.processed.join("one.pdf").exists());
    }

    #[tokio::test]
    async fn test_corrupt_archive_does_not_abort_client() {
        let (_dir, config) = setup();
        std::fs::write(config.folders.source.join("[Acme]bad.zip"), b"garbage").unwrap();
        fixtures::write_zip(&config.folders.source.join("[Acme]good.zip"), &[("ok.pdf", "1")]);

        let api = MockHelpdesk::new();
        api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)])
            .await;

        let summary = IntakePipeline::new(&config, &api, date()).run().await.unwrap();

        assert_eq!(summary.tickets_created(), 1);
        let tickets = api.recorded_tickets().await;
        assert_eq!(tickets[0].ticket.article.attachments.len(), 1);
        // Both originals move once the ticket exists, the corrupt one included.
        assert!(config.folders.processed.join("[Acme]bad.zip").exists());
        assert!(config.folders.processed.join("[Acme]good.zip").exists());
    }

    #[tokio::test]
    async fn test_missing_source_folder_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = fixtures::config(dir.path().to_path_buf());
        let api = MockHelpdesk::new();

        let result = IntakePipeline::new(&config, &api, date()).run().await;
        assert!(matches!(result, Err(PipelineError::Scan(_))));
    }
}
