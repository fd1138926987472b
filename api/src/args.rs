use clap::Parser;
use mealsnap_core::domain::common::{
    DEFAULT_GLM_API_URL, DEFAULT_GLM_MODEL, LLMConfig, MealSnapConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "mealsnap-api", version, about = "MealSnap food recognition API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long, env = "PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Prefix for every route, e.g. `/mealsnap`.
    #[arg(long, env = "ROOT_PATH", default_value = "")]
    pub root_path: String,

    /// Comma separated; empty or `*` allows any origin.
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "glm-api-url", env = "GLM_API_URL", default_value = DEFAULT_GLM_API_URL)]
    pub api_url: String,

    #[arg(long = "glm-api-key", env = "GLM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long = "glm-model", env = "GLM_MODEL", default_value = DEFAULT_GLM_MODEL)]
    pub model: String,

    #[arg(long = "glm-temperature", env = "GLM_TEMPERATURE", default_value_t = 0.3)]
    pub temperature: f32,

    #[arg(long = "glm-max-tokens", env = "GLM_MAX_TOKENS", default_value_t = 4096)]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for MealSnapConfig {
    fn from(args: Args) -> Self {
        MealSnapConfig {
            llm: LLMConfig {
                api_url: args.llm.api_url,
                api_key: args.llm.api_key,
                model: args.llm.model,
                temperature: args.llm.temperature,
                max_tokens: args.llm.max_tokens,
            },
        }
    }
}
