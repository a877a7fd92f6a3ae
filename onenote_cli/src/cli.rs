use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "onenote")]
#[command(about = "OneNote - Microsoft OneNote from the terminal")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  onenote login                           Sign in with a device code
  onenote notebooks                       List your notebooks
  onenote pages --notebook Work           List pages in a notebook
  onenote page \"Meeting Notes\"            Print a page's content
  onenote search \"budget\"                 Search page titles

\x1b[1;36mAuthentication:\x1b[0m
  onenote login                           Device-code sign-in (no app setup)
  onenote token set                       Paste an existing Graph access token
  onenote token status                    Show where the token comes from

\x1b[1;36mMore Info:\x1b[0m
  onenote <command> --help                Get help for any command
  https://github.com/srv1n/onenote-mcp    Full documentation")]
#[command(long_about = "
\x1b[1mOneNote\x1b[0m - Microsoft OneNote CLI

Browse notebooks, sections, and pages over Microsoft Graph, fetch page
content as XHTML, create pages, and search page titles. The same core
drives the bundled MCP server, so a token saved here works there too.

Sign in once with \x1b[1monenote login\x1b[0m (device code, no Azure app registration
needed) or export GRAPH_ACCESS_TOKEN for a throwaway session.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Work against a Microsoft 365 group's notebooks (name or id)
    #[arg(short, long, global = true)]
    pub group: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Copy output to clipboard
    #[arg(short, long, global = true)]
    pub copy: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to Microsoft Graph with a device code
    ///
    /// Prints a verification URL and a short code, then waits for you to
    /// finish signing in from a browser. The token is saved to the
    /// configured storage (keychain by default).
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  onenote login                           Sign in and save the token
  onenote login --tenant contoso.com      Sign in against one tenant
  ONENOTE_MCP_TOKEN_STORAGE=file \\
      onenote login                       Save to the token file instead")]
    Login {
        /// Azure AD tenant to sign in against (defaults to "common")
        #[arg(long)]
        tenant: Option<String>,
        /// App registration to use instead of CLIENT_ID / the built-in default
        #[arg(long = "client-id")]
        client_id: Option<String>,
    },

    /// Manage the saved Graph access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// List notebooks
    #[command(alias = "nb")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  onenote notebooks                       Show your notebooks
  onenote notebooks --group \"Team X\"      Show a group's notebooks
  onenote notebooks --output json         Output as JSON")]
    Notebooks,

    /// List sections, optionally inside one notebook
    Sections {
        /// Notebook to look inside (name or id; partial names match)
        notebook: Option<String>,
    },

    /// List pages in a section
    ///
    /// The section resolves by id or name; without either the first
    /// section is used.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  onenote pages                           Pages of the first section
  onenote pages --notebook Work           First section of a notebook
  onenote pages Journal                   Pages of a named section")]
    Pages {
        /// Section name or id (partial names match; omit for the first section)
        section: Option<String>,
        /// Notebook to look inside (name or id)
        #[arg(long)]
        notebook: Option<String>,
        /// Exact section id (skips the lookup)
        #[arg(long = "section-id")]
        section_id: Option<String>,
    },

    /// Print a page's XHTML content
    ///
    /// The page is matched by id, then id fragment, then title substring.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  onenote page \"Meeting Notes\"            Match by title
  onenote page 1-abc123... --out p.html   Write the body to a file")]
    Page {
        /// Page id, id fragment, or title substring (omit for the first page)
        query: Option<String>,
        /// Write the XHTML body to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a page in a section
    #[command(alias = "new")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  onenote create --title \"Standup\"        Minimal page in the first section
  onenote create --notebook Work --section Journal --title \"Friday\" \\
      --html-file note.html               Page from an XHTML file")]
    Create {
        /// Notebook to look inside (name or id)
        #[arg(long)]
        notebook: Option<String>,
        /// Section name (partial names match)
        #[arg(long)]
        section: Option<String>,
        /// Exact section id (skips the lookup)
        #[arg(long = "section-id")]
        section_id: Option<String>,
        /// Page title (defaults to "New Page")
        #[arg(long)]
        title: Option<String>,
        /// Inline XHTML body
        #[arg(long, conflicts_with = "html_file")]
        html: Option<String>,
        /// Read the XHTML body from a file
        #[arg(long = "html-file")]
        html_file: Option<PathBuf>,
    },

    /// Search page titles (case-insensitive substring match)
    Search {
        /// Text to look for in page titles
        query: String,
    },

    /// List Microsoft 365 groups that have OneNote notebooks
    Groups,

    /// Show version, token storage, and logging configuration
    Info,
}

#[derive(Subcommand, Clone)]
pub enum TokenAction {
    /// Print the current access token (masked unless --full)
    Show {
        /// Print the full token instead of a masked preview
        #[arg(long)]
        full: bool,
    },
    /// Save an access token (prompts with hidden input when no value given)
    Set {
        /// Token value (omit to be prompted)
        token: Option<String>,
    },
    /// Show where the token comes from and where writes would go
    Status,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable cards and tables (default)
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
