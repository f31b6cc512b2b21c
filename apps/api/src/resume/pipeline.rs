//! Resume pipeline: duplicate guard, extract, prompt, complete, parse, save.
//!
//! A run either reaches `save` or leaves no output behind. The only state shared
//! across runs is the output folder (and the CSV ledger inside it).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::CompletionClient;
use crate::resume::prompts::build_prompt;
use crate::resume::response::parse_response;
use crate::resume::{ledger, persistence, ResumeError};

pub const ALREADY_PARSED_MESSAGE: &str = "That file has already been parsed.";

pub struct ResumeParser {
    extractor: TextExtractor,
    llm: Arc<dyn CompletionClient>,
    model: String,
    max_tokens: u32,
    output_folder: PathBuf,
    /// Serializes output writes so concurrent CSV appends cannot interleave.
    write_lock: Mutex<()>,
}

impl ResumeParser {
    pub fn new(
        extractor: TextExtractor,
        llm: Arc<dyn CompletionClient>,
        model: impl Into<String>,
        max_tokens: u32,
        output_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor,
            llm,
            model: model.into(),
            max_tokens,
            output_folder: output_folder.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(
        config: &Config,
        extractor: TextExtractor,
        llm: Arc<dyn CompletionClient>,
    ) -> Self {
        Self::new(
            extractor,
            llm,
            config.completion_model.clone(),
            config.completion_max_tokens,
            config.output_folder.clone(),
        )
    }

    /// Runs the pipeline against the configured output folder.
    pub async fn process(&self, file_path: &Path, format: &str) -> Result<String, ResumeError> {
        self.process_into(file_path, format, &self.output_folder)
            .await
    }

    /// Runs the pipeline, reading the ledger from and writing output to `output_folder`.
    pub async fn process_into(
        &self,
        file_path: &Path,
        format: &str,
        output_folder: &Path,
    ) -> Result<String, ResumeError> {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ledger_folder = output_folder.to_path_buf();
        let lookup_name = file_name.clone();
        let already_parsed = tokio::task::spawn_blocking(move || {
            ledger::has_been_parsed(&ledger_folder, &lookup_name)
        })
        .await?;
        if already_parsed {
            info!("Skipping {file_name}: already in ledger");
            return Ok(ALREADY_PARSED_MESSAGE.to_string());
        }

        let text = self.extractor.extract(file_path).await?;
        let prompt = build_prompt(&text);
        let raw = self
            .llm
            .complete(&prompt, &self.model, self.max_tokens)
            .await?;
        let record = parse_response(&raw, &file_name)?;

        let format = format.to_string();
        let target = output_folder.to_path_buf();
        let output_path = {
            let _guard = self.write_lock.lock().await;
            tokio::task::spawn_blocking(move || persistence::save(&record, &format, &target))
                .await??
        };

        Ok(format!(
            "Resume parse result has been successfully saved at {}",
            output_path.display()
        ))
    }
}
