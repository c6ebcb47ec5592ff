//! CLI for NanoBrand - AI landing-page generation.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use nanobrand::{CredentialStore, GeminiClient, NanoBrandError, Phase, Session, Slot};
use std::io::Write;
use std::path::PathBuf;

const MSG_NEED_KEY: &str = "يرجى إدخال مفتاح API الخاص بك أولاً.";
const MSG_NEED_IMAGES: &str = "ارفع صور المنتج أولاً.";
const MSG_GENERATION_FAILED: &str = "حدث خطأ. تأكد من صحة مفتاح الـ API وصلاحية الصور.";
const MSG_REGEN_FAILED: &str = "فشل في التوليد. تحقق من المفتاح.";
const MSG_CONFIRM_RESET: &str = "هل تريد البدء من جديد؟ (y/n) ";

#[derive(Parser)]
#[command(name = "nanobrand")]
#[command(about = "Generate an Arabic luxury landing page from product photos via Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full landing page from product photos
    Generate(GenerateArgs),

    /// Regenerate a single section image of a saved session
    Regen(RegenArgs),

    /// Edit one text node of a saved session in place
    Edit(EditArgs),

    /// Export a saved session as a timestamped HTML artifact
    Export(ExportArgs),

    /// Clear a saved session (asks for confirmation)
    Reset(ResetArgs),

    /// Manage the stored API key
    Key(KeyArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Product photos, in order (at least one)
    images: Vec<PathBuf>,

    /// Variants context (colors, sizes, ...)
    #[arg(long, default_value = "")]
    variants: String,

    /// Notes context (delivery, warranty, ...)
    #[arg(long, default_value = "")]
    notes: String,

    /// Output directory for the session file and the exported page
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// API key override; also written through to the credential store
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Args)]
struct RegenArgs {
    /// Session file written by `generate`
    session: PathBuf,

    /// Section image to regenerate
    #[arg(short, long, value_enum)]
    slot: SlotArg,

    /// Benefit index (required with --slot benefit)
    #[arg(short, long)]
    index: Option<usize>,

    /// API key override; also written through to the credential store
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Args)]
struct EditArgs {
    /// Session file written by `generate`
    session: PathBuf,

    /// Edit path, e.g. hero.headline or faqs.0.answer
    path: String,

    /// New text
    value: String,
}

#[derive(Args)]
struct ExportArgs {
    /// Session file written by `generate`
    session: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

#[derive(Args)]
struct ResetArgs {
    /// Session file to clear
    session: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Args)]
struct KeyArgs {
    #[command(subcommand)]
    command: KeyCommands,
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Store the API key
    Set {
        /// The Gemini API key
        token: String,
    },
    /// Show whether a key is stored
    Show,
    /// Verify the stored key against the remote service
    Check,
    /// Remove the stored key
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SlotArg {
    Hero,
    Problem,
    Solution,
    Benefit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args, cli.json).await?,
        Commands::Regen(args) => regen(args, cli.json).await?,
        Commands::Edit(args) => edit(args, cli.json)?,
        Commands::Export(args) => export(args, cli.json).await?,
        Commands::Reset(args) => reset(args, cli.json)?,
        Commands::Key(args) => key(args, cli.json).await?,
    }

    Ok(())
}

/// Resolves the credential: explicit flag first (written through to the
/// store), then the store, then the env fallback inside the builder.
fn build_client(api_key: Option<String>) -> anyhow::Result<GeminiClient> {
    let store = CredentialStore::open_default()?;
    let mut builder = GeminiClient::builder();

    if let Some(key) = api_key {
        store.save(&key)?;
        builder = builder.api_key(key);
    } else if let Some(key) = store.load()? {
        builder = builder.api_key(key);
    }

    builder.build().map_err(|e| match e {
        NanoBrandError::Auth(_) => anyhow::anyhow!("{MSG_NEED_KEY}"),
        other => other.into(),
    })
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    if args.images.is_empty() {
        anyhow::bail!("{MSG_NEED_IMAGES}");
    }
    let client = build_client(args.api_key)?;

    let mut session = Session::new();
    for image in &args.images {
        session
            .add_image_file(image)
            .with_context(|| format!("could not read {}", image.display()))?;
    }
    session.set_variants(args.variants);
    session.set_notes(args.notes);

    session
        .generate(&client, &client, |p| eprintln!("{}", p.label()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "generation failed");
            anyhow::anyhow!("{MSG_GENERATION_FAILED}")
        })?;

    std::fs::create_dir_all(&args.out)?;
    let session_path = args.out.join("session.json");
    session.save(&session_path)?;
    let artifact = session.export(&args.out).await?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "session": session_path.display().to_string(),
            "artifact": artifact.display().to_string(),
            "benefits": session.page().map(|p| p.benefits.items.len()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("تم إنشاء الصفحة: {}", artifact.display());
        println!("ملف الجلسة: {}", session_path.display());
    }
    Ok(())
}

fn resolve_slot(slot: SlotArg, index: Option<usize>) -> anyhow::Result<Slot> {
    Ok(match slot {
        SlotArg::Hero => Slot::Hero,
        SlotArg::Problem => Slot::Problem,
        SlotArg::Solution => Slot::Solution,
        SlotArg::Benefit => {
            let i = index.context("--index is required with --slot benefit")?;
            Slot::Benefit(i)
        }
    })
}

async fn regen(args: RegenArgs, json_output: bool) -> anyhow::Result<()> {
    let client = build_client(args.api_key)?;
    let slot = resolve_slot(args.slot, args.index)?;

    let mut session = Session::load(&args.session)?;
    session
        .regenerate(&client, slot, |p| eprintln!("{}", p.label()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %slot, "regeneration failed");
            anyhow::anyhow!("{MSG_REGEN_FAILED}")
        })?;
    session.save(&args.session)?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({ "success": true, "slot": slot.to_string() })
        );
    } else {
        println!("تم تحديث الصورة: {slot}");
    }
    Ok(())
}

fn edit(args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    let mut session = Session::load(&args.session)?;
    session.edit(&args.path, &args.value)?;
    session.save(&args.session)?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({ "success": true, "path": args.path })
        );
    } else {
        println!("تم حفظ التعديل: {}", args.path);
    }
    Ok(())
}

async fn export(args: ExportArgs, json_output: bool) -> anyhow::Result<()> {
    let mut session = Session::load(&args.session)?;
    std::fs::create_dir_all(&args.out)?;
    let artifact = session.export(&args.out).await?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({ "success": true, "artifact": artifact.display().to_string() })
        );
    } else {
        println!("تم تصدير الصفحة: {}", artifact.display());
    }
    Ok(())
}

fn reset(args: ResetArgs, json_output: bool) -> anyhow::Result<()> {
    if !args.yes {
        eprint!("{MSG_CONFIRM_RESET}");
        std::io::stderr().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y") {
            return Ok(());
        }
    }

    let mut session = Session::load(&args.session).unwrap_or_default();
    session.reset();
    debug_assert_eq!(session.phase(), Phase::Empty);
    session.save(&args.session)?;

    if json_output {
        println!("{}", serde_json::json!({ "success": true }));
    } else {
        println!("تم مسح البيانات.");
    }
    Ok(())
}

async fn key(args: KeyArgs, json_output: bool) -> anyhow::Result<()> {
    let store = CredentialStore::open_default()?;
    match args.command {
        KeyCommands::Set { token } => {
            store.save(&token)?;
            if json_output {
                println!("{}", serde_json::json!({ "success": true }));
            } else {
                println!("تم حفظ المفتاح في: {}", store.path().display());
            }
        }
        KeyCommands::Show => {
            let present = store.load()?.is_some();
            if json_output {
                println!("{}", serde_json::json!({ "stored": present }));
            } else if present {
                println!("يوجد مفتاح محفوظ.");
            } else {
                println!("{MSG_NEED_KEY}");
            }
        }
        KeyCommands::Check => {
            let client = build_client(None)?;
            match client.health_check().await {
                Ok(()) => {
                    if json_output {
                        println!("{}", serde_json::json!({ "connected": true }));
                    } else {
                        println!("الاتصال بالخدمة يعمل.");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "health check failed");
                    if json_output {
                        println!("{}", serde_json::json!({ "connected": false }));
                    } else {
                        println!("{MSG_NEED_KEY}");
                    }
                    std::process::exit(1);
                }
            }
        }
        KeyCommands::Clear => {
            store.clear()?;
            if json_output {
                println!("{}", serde_json::json!({ "success": true }));
            } else {
                println!("تم حذف المفتاح.");
            }
        }
    }
    Ok(())
}
