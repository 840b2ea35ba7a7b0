use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "thirai")]
#[command(about = "Thirai - YouTube data access and playlist tooling")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  thirai list                                List all available connectors
  thirai tools                               Show all tools with auth requirements
  thirai tools playlists                     Show tools for a specific connector
  thirai videos search_videos --query rust   Call a tool directly
  thirai get https://youtu.be/dQw4w9WgXcQ    Auto-detect a URL or id

\x1b[1;36mAuthentication:\x1b[0m
  thirai config set youtube --value <key>    Save a YouTube Data API key
  thirai config show                         View current auth configuration
  thirai config test youtube                 Test authentication

\x1b[1;36mMore Info:\x1b[0m
  thirai <command> --help                    Get help for any command
  https://github.com/srv1n/thirai            Full documentation")]
#[command(long_about = "
\x1b[1mThirai\x1b[0m - YouTube Data Access CLI

Video, playlist, and channel lookup through the YouTube Data API, plus
playlist maintenance: scan for deleted or private entries, plan merges,
and filter by add time. Transcripts come straight from YouTube's caption
endpoints and need no API key.

All connectors expose their capabilities as \x1b[1mtools\x1b[0m. Use `thirai tools` to see
what's available and their authentication requirements.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all available connectors (data sources)
    ///
    /// Shows a table of all connectors with their descriptions and auth status.
    #[command(alias = "ls")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  thirai list                   Show all connectors
  thirai list --output json     Output as JSON")]
    List,

    /// List available tools with auth requirements
    ///
    /// Shows all tools across connectors, or tools for a specific connector.
    /// Each tool shows its parameters, whether auth is required, and examples.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  thirai tools                  List ALL tools from all connectors
  thirai tools playlists        Show playlist tools
  thirai tools transcripts      Show transcript tools (no auth needed)
  thirai tools --output json    Output as JSON for scripting")]
    Tools {
        /// Connector name to filter tools (omit to show all)
        connector: Option<String>,
    },

    /// Call a tool directly from a connector
    ///
    /// You can use the simplified syntax: `thirai <connector> <tool> [args...]`
    /// The CLI automatically maps positional arguments to the tool's parameters.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  # Simplified syntax (connector as first argument):
  thirai videos search_videos --query \"rust\" --max-results 10
  thirai playlists get_playlist PLBCF2DAC6FFB574DE
  thirai playlists find_unavailable_videos --playlist-id PLBCF2DAC6FFB574DE

  # JSON args (for advanced/scripting use):
  thirai call videos search_videos --args '{\"query\": \"rust\", \"maxResults\": 10}'
  thirai call playlists merge_playlists --args '{\"sourcePlaylistIds\": [\"PLa\", \"PLb\"], \"targetPlaylistId\": \"PLc\"}'")]
    Call {
        /// Connector name (e.g., videos, playlists, channels, transcripts)
        connector: String,
        /// Tool name (e.g., search_videos, get_playlist_items)
        tool: String,
        /// JSON arguments (e.g., '{"query": "rust"}')
        #[arg(long, conflicts_with = "params")]
        args: Option<String>,
        /// Positional arguments for the tool (simplified syntax)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Fetch content by automatically detecting the URL or ID type
    ///
    /// Paste any supported YouTube URL or id and it is routed to the right connector.
    #[command(alias = "fetch")]
    #[command(after_help = "\x1b[1;33mSupported Inputs:\x1b[0m
  Video:      https://youtube.com/watch?v=xxx, youtu.be/xxx, bare 11-char id
  Playlist:   https://youtube.com/playlist?list=xxx, PL.../UU.../LL... id
  Channel:    https://youtube.com/channel/UCxxx, youtube.com/@handle, @handle

\x1b[1;33mExamples:\x1b[0m
  thirai get https://www.youtube.com/watch?v=dQw4w9WgXcQ
  thirai get PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf
  thirai get @veritasium")]
    Get {
        /// URL or ID to fetch (auto-detected)
        input: String,
    },

    /// Show all supported URL/ID patterns for auto-detection
    #[command(alias = "patterns")]
    Formats,

    /// Manage configuration and authentication
    ///
    /// Set, view, test, or remove authentication credentials.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  thirai config show                    Show all saved credentials
  thirai config set youtube --value AIza...
  thirai config test youtube            Test the saved API key
  thirai config remove youtube          Remove saved credentials")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set authentication for a provider
    Set {
        /// Provider name (e.g., youtube)
        provider: String,
        /// API key value
        #[arg(long)]
        value: Option<String>,
    },
    /// Remove authentication for a provider
    Remove {
        /// Provider name
        provider: String,
    },
    /// Test authentication for a provider
    Test {
        /// Provider name
        provider: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
    /// Markdown output
    Markdown,
}
