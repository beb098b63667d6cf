use centimo_storage::DbPool;
use centimo_suggest::OpenAiClient;

pub struct AppState {
    pub db: DbPool,
    /// `None` when no API key is configured; the AI endpoint then returns 503.
    pub suggester: Option<OpenAiClient>,
    pub confidence_threshold: f64,
}
