use crate::domain::model::Provider;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Local,
    Openai,
    Gemini,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Local => Provider::Local,
            ProviderArg::Openai => Provider::OpenAi,
            ProviderArg::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hkt")]
#[command(about = "Translate the selected text (or TEXT) into Russian.")]
#[command(version)]
pub struct Cli {
    /// Only print the acquired selection, don't translate
    #[arg(long)]
    pub selection: bool,

    /// Use this provider for one run
    #[arg(short = 'p', long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List Gemini models that support generateContent
    #[arg(long)]
    pub list_models: bool,

    /// Check that a Gemini model id supports generateContent
    #[arg(long, value_name = "MODEL")]
    pub check_model: Option<String>,

    /// Read an API key from stdin and store it in the system vault
    #[arg(long, value_enum, value_name = "PROVIDER")]
    pub set_key: Option<ProviderArg>,

    /// Show recent translations
    #[arg(long)]
    pub history: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Text to translate; the current selection when omitted
    #[arg(num_args = 1..)]
    pub text: Vec<String>,
}

impl Cli {
    pub fn provider(&self) -> Option<Provider> {
        self.provider.map(Provider::from)
    }
}
