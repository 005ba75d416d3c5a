pub mod html_fetcher;
pub mod llm_client;

pub use html_fetcher::{fetcher_from_config, DirectFetcher, HtmlFetcher, ScrapingAntFetcher};
pub use llm_client::{CompletionClient, CompletionOptions, OpenAiCompletionClient};
