//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use tokio::io::{AsyncBufReadExt, BufReader};

use mtss_core::llm::OpenAiGenerator;
use mtss_core::{
    Catalog, CatalogQuery, ChatService, Domain, ExportArtifact, Grade, ResourceDocument,
    ResourceType, Session, Settings, TextGenerator, Tier, WELCOME_BUTTONS, WELCOME_MESSAGE,
};
use mtss_html::{export_html, export_preview, normalize};
use mtss_pdf::{export_pdf_with, export_preview_pdf, ExportOptions};

/// Output format for catalog listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// File format written by `render`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// Paginated PDF
    #[default]
    Pdf,
    /// Standalone HTML for Google Docs import
    Html,
}

/// Files written for a generated resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Paginated PDF
    #[default]
    Pdf,
    /// Standalone HTML
    Html,
    /// Assembled markdown
    Markdown,
    /// PDF, HTML and markdown
    All,
}

impl ExportFormat {
    fn includes(self, other: ExportFormat) -> bool {
        self == ExportFormat::All || self == other
    }
}

#[derive(Parser)]
#[command(name = "mtss")]
#[command(author, version, about = "Evidence-based MTSS resources from a conversation", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./mtss.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant and generate a resource interactively
    Chat {
        /// School level the resource is for
        #[arg(short, long, default_value = "K-12")]
        school_level: String,

        /// Session file to resume from and save to
        #[arg(long)]
        session: Option<PathBuf>,

        /// Directory for generated files
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Generate a resource from a saved session or a list of messages
    Generate {
        /// Saved session JSON
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// User message to add to the conversation (repeatable)
        #[arg(short, long)]
        message: Vec<String>,

        /// Resource type (menu, plan, monitoring); inferred when omitted
        #[arg(short, long)]
        resource_type: Option<ResourceType>,

        /// School level for a new conversation
        #[arg(short, long, default_value = "K-12")]
        school_level: String,

        /// Files to write
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: ExportFormat,

        /// Directory for generated files
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Write uncompressed PDF content streams
        #[arg(long)]
        no_compress: bool,
    },

    /// Render markdown or an edited preview to PDF or HTML
    Render {
        /// Input file or glob pattern (.md, .html)
        input: String,

        /// Output format (pdf or html)
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: RenderFormat,

        /// Resource type used for headers
        #[arg(short, long, default_value = "menu")]
        resource_type: ResourceType,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Write uncompressed PDF content streams
        #[arg(long)]
        no_compress: bool,
    },

    /// Convert preview HTML back to markdown
    Normalize {
        /// Input HTML file
        input: PathBuf,

        /// Output markdown file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List interventions from the built-in catalog
    Catalog {
        /// Tier number (1, 2 or 3)
        #[arg(short, long)]
        tier: Option<u8>,

        /// Domain (academic, behavior, life-skills, attendance)
        #[arg(short, long)]
        domain: Option<String>,

        /// Grade (PK, K, 1-12)
        #[arg(short, long)]
        grade: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Chat {
            school_level,
            session,
            output,
        } => {
            let settings = load_settings(config)?;
            let service = chat_service(&settings)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(chat_command(
                &service,
                &settings,
                &school_level,
                session.as_deref(),
                &output,
            ))?;
        }
        Commands::Generate {
            transcript,
            message,
            resource_type,
            school_level,
            format,
            output,
            no_compress,
        } => {
            let settings = load_settings(config)?;
            let service = chat_service(&settings)?;
            let session =
                build_session(transcript.as_deref(), &message, resource_type, &school_level)?;
            let options = ExportOptions {
                compress: !no_compress,
                ..ExportOptions::default()
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(generate_command(
                &service, &settings, session, format, &output, &options,
            ))?;
        }
        Commands::Render {
            input,
            format,
            resource_type,
            output,
            no_compress,
        } => {
            let settings = load_settings(config)?;
            let options = ExportOptions {
                compress: !no_compress,
                ..ExportOptions::default()
            };
            render_command(&input, format, resource_type, &output, &settings, &options)?;
        }
        Commands::Normalize { input, output } => {
            normalize_command(&input, output.as_deref())?;
        }
        Commands::Catalog {
            tier,
            domain,
            grade,
            format,
        } => {
            catalog_command(tier, domain.as_deref(), grade.as_deref(), format)?;
        }
    }

    Ok(())
}

/// Build a chat service backed by the configured OpenAI-compatible endpoint
fn chat_service(settings: &Settings) -> Result<ChatService> {
    let generator = OpenAiGenerator::from_settings(&settings.llm)
        .context("Failed to configure the text generator")?;
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);
    Ok(ChatService::from_settings(generator, settings))
}

/// Execute the chat command
///
/// Reads user messages from stdin. `/generate` assembles the resource and
/// writes PDF and HTML files; a number picks one of the suggested buttons.
pub async fn chat_command(
    service: &ChatService,
    settings: &Settings,
    school_level: &str,
    session_path: Option<&Path>,
    output_dir: &Path,
) -> Result<()> {
    let mut session = match session_path {
        Some(path) if path.exists() => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read session: {}", path.display()))?;
            Session::from_json(&json)
                .with_context(|| format!("Failed to parse session: {}", path.display()))?
        }
        _ => Session::new(school_level),
    };

    let mut buttons: Vec<String> = WELCOME_BUTTONS.iter().map(|b| b.to_string()).collect();
    if session.transcript().is_empty() {
        println!("{}", WELCOME_MESSAGE);
    } else {
        println!("Resumed session {} ({} messages)", session.id, session.transcript().len());
        buttons = session
            .resource_type
            .default_buttons()
            .iter()
            .map(|b| b.to_string())
            .collect();
    }
    print_buttons(&buttons);
    println!("Type /generate to create the resource, /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/generate" => match service.generate_resource(&mut session).await {
                Ok(generated) => {
                    println!("{}", generated.reply.text);
                    let options = ExportOptions::default();
                    for path in write_exports(
                        &generated.document,
                        settings,
                        ExportFormat::All,
                        output_dir,
                        &options,
                    )? {
                        println!("  Created: {}", path.display());
                    }
                    buttons = generated.reply.suggested_buttons;
                    print_buttons(&buttons);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Resource generation failed");
                    eprintln!("{}", e.user_message());
                }
            },
            _ => {
                let message = pick_button(input, &buttons).unwrap_or(input);
                match service.send(&mut session, message).await {
                    Ok(reply) => {
                        println!("{}", reply.text);
                        buttons = reply.suggested_buttons;
                        print_buttons(&buttons);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Chat turn failed");
                        eprintln!("{}", e.user_message());
                    }
                }
            }
        }

        if let Some(path) = session_path {
            fs::write(path, session.to_json()?)
                .with_context(|| format!("Failed to save session: {}", path.display()))?;
        }
    }

    Ok(())
}

fn print_buttons(buttons: &[String]) {
    for (i, label) in buttons.iter().enumerate() {
        println!("  [{}] {}", i + 1, label);
    }
}

/// Resolve a 1-based button number to its label
pub fn pick_button<'a>(input: &str, buttons: &'a [String]) -> Option<&'a str> {
    let n: usize = input.parse().ok()?;
    buttons.get(n.checked_sub(1)?).map(String::as_str)
}

/// Assemble a session from a saved transcript and extra user messages
///
/// An explicit resource type wins; otherwise the last message that names
/// one decides.
pub fn build_session(
    transcript: Option<&Path>,
    messages: &[String],
    resource_type: Option<ResourceType>,
    school_level: &str,
) -> Result<Session> {
    let mut session = match transcript {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Transcript file not found: {}", path.display());
            }
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
            Session::from_json(&json)
                .with_context(|| format!("Failed to parse transcript: {}", path.display()))?
        }
        None => Session::new(school_level),
    };

    for message in messages {
        if let Some(inferred) = ResourceType::infer(message) {
            session.resource_type = inferred;
        }
        session.push_user(message.as_str());
    }
    if let Some(rt) = resource_type {
        session.resource_type = rt;
    }

    if session.transcript().is_empty() {
        anyhow::bail!("Nothing to generate from: pass --transcript or --message");
    }
    if !session.resource_type.is_set() {
        anyhow::bail!("Could not tell which resource to generate: pass --resource-type");
    }
    Ok(session)
}

/// Execute the generate command
pub async fn generate_command(
    service: &ChatService,
    settings: &Settings,
    mut session: Session,
    format: ExportFormat,
    output_dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    println!("mtss v{}", mtss_core::VERSION);
    println!(
        "Generating: {} ({} messages)",
        session.resource_type.title(),
        session.transcript().len()
    );

    let generated = service
        .generate_resource(&mut session)
        .await
        .context("Resource generation failed")?;

    let paths = write_exports(&generated.document, settings, format, output_dir, options)?;
    for path in &paths {
        println!("  Created: {}", path.display());
    }
    println!();
    println!("Generation complete!");
    Ok(paths)
}

/// Write the requested export files for an assembled document
fn write_exports(
    doc: &ResourceDocument,
    settings: &Settings,
    format: ExportFormat,
    output_dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut artifacts = Vec::new();
    if format.includes(ExportFormat::Markdown) {
        artifacts.push(ExportArtifact::new(
            doc.filename("md"),
            doc.markdown.clone().into_bytes(),
            "text/markdown",
        ));
    }
    if format.includes(ExportFormat::Html) {
        artifacts.push(export_html(doc, settings).context("HTML export failed")?);
    }
    if format.includes(ExportFormat::Pdf) {
        artifacts.push(export_pdf_with(doc, settings, options).context("PDF export failed")?);
    }

    artifacts
        .iter()
        .map(|a| {
            a.write_to(output_dir)
                .with_context(|| format!("Failed to write {}", a.filename))
        })
        .collect()
}

/// Execute the render command
///
/// `.html` and `.htm` inputs are treated as previews and normalized first;
/// anything else is read as markdown. Each output is named after its input.
pub fn render_command(
    pattern: &str,
    format: RenderFormat,
    resource_type: ResourceType,
    output_dir: &Path,
    settings: &Settings,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    println!("mtss v{}", mtss_core::VERSION);
    println!("Rendering: {}", pattern);

    let inputs: Vec<PathBuf> = glob(pattern)
        .with_context(|| format!("Invalid glob pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                eprintln!("Warning: Could not read {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    if inputs.is_empty() {
        anyhow::bail!("Input file not found: {}", pattern);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut written = Vec::new();
    for input in &inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read: {}", input.display()))?;
        let is_preview = matches!(
            input.extension().and_then(|e| e.to_str()),
            Some("html") | Some("htm")
        );

        let artifact = match (format, is_preview) {
            (RenderFormat::Pdf, true) => export_preview_pdf(&text, resource_type, settings, options)?,
            (RenderFormat::Pdf, false) => {
                let doc = ResourceDocument::new(resource_type, text);
                export_pdf_with(&doc, settings, options)?
            }
            (RenderFormat::Html, true) => export_preview(&text, resource_type, settings)?,
            (RenderFormat::Html, false) => {
                export_html(&ResourceDocument::new(resource_type, text), settings)?
            }
        };

        let extension = match format {
            RenderFormat::Pdf => "pdf",
            RenderFormat::Html => "html",
        };
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| resource_type.file_stem().to_string());
        let output_path = output_dir.join(format!("{}.{}", stem, extension));
        fs::write(&output_path, &artifact.bytes)
            .with_context(|| format!("Failed to write: {}", output_path.display()))?;

        println!("  Created: {} ({} bytes)", output_path.display(), artifact.len());
        written.push(output_path);
    }

    println!();
    println!("Render complete!");
    Ok(written)
}

/// Execute the normalize command
pub fn normalize_command(input: &Path, output: Option<&Path>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let html = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;
    let markdown =
        normalize(&html).with_context(|| format!("Failed to normalize: {}", input.display()))?;

    match output {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote markdown");
        }
        None => print!("{}", markdown),
    }
    Ok(())
}

/// Execute the catalog command
pub fn catalog_command(
    tier: Option<u8>,
    domain: Option<&str>,
    grade: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    println!("{}", catalog_listing(tier, domain, grade, format)?);
    Ok(())
}

/// Render the filtered catalog as text or JSON
pub fn catalog_listing(
    tier: Option<u8>,
    domain: Option<&str>,
    grade: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let query = CatalogQuery {
        tier: tier
            .map(|n| Tier::from_number(n).with_context(|| format!("Unknown tier: {}", n)))
            .transpose()?,
        domain: domain
            .map(|d| Domain::parse(d).with_context(|| format!("Unknown domain: {}", d)))
            .transpose()?,
        grade: grade
            .map(|g| Grade::parse(g).with_context(|| format!("Unknown grade: {}", g)))
            .transpose()?,
    };

    let catalog = Catalog::standard();
    if format == OutputFormat::Json && query == CatalogQuery::default() {
        return Ok(catalog.to_prompt_json()?);
    }

    let entries = catalog.filter(query);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => Ok(format!(
            "{} intervention(s)\n\n{}",
            entries.len(),
            Catalog::describe(&entries).trim_end()
        )),
    }
}

/// Load settings from a config file or use defaults
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    if let Some(path) = config_path {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    Settings::load(config_path).context("Failed to load settings")
}
