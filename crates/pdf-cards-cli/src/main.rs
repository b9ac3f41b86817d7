use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_cards::pdfium::PdfiumLoader;
use pdf_cards::{
    CardViewer, DisplayOutcome, DisplayTarget, JsonFileStore, PdfDocument, ViewedCards,
    ViewerConfig, load_document,
};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfc", about = "PDF flash-card deck CLI", version)]
struct Cli {
    /// Viewer configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Card deck PDF, overrides the configuration
    #[arg(long, global = true)]
    pdf: Option<PathBuf>,

    /// Viewed-state file, overrides the configuration
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories with their viewed counts
    Categories,

    /// List the cards of a category
    Cards {
        /// Category name (e.g. level2)
        category: String,
    },

    /// Render a card to PNG and mark it viewed
    Render {
        /// Category name; "instructions" renders an instruction page
        #[arg(short, long)]
        category: String,

        /// Card number within the category, starting at 1
        #[arg(short = 'n', long)]
        card: usize,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Available width in pixels
        #[arg(long, default_value = "840")]
        width: f32,
    },

    /// Show viewed page numbers
    Viewed,

    /// Forget every viewed card
    Reset,

    /// Check the catalog against the PDF's page count
    Check,

    /// Write the effective configuration as JSON
    InitConfig {
        /// Output JSON file
        output: PathBuf,
    },
}

fn open_viewer(config: &ViewerConfig) -> CardViewer<JsonFileStore> {
    let store = JsonFileStore::open_or_empty(&config.state_path);
    let viewed = ViewedCards::load(store, &config.storage_key);
    CardViewer::new(config.catalog.clone(), viewed, config.render)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let mut config = ViewerConfig::load_or_default(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(pdf) = cli.pdf {
        config.pdf_path = pdf;
    }
    if let Some(state) = cli.state {
        config.state_path = state;
    }

    match cli.command {
        Commands::Categories => {
            let viewer = open_viewer(&config);
            for category in viewer.catalog().categories() {
                let viewed = category
                    .pages
                    .iter()
                    .filter(|&&p| viewer.is_viewed(p))
                    .count();
                println!(
                    "{:<14} {:<14} {}/{} viewed",
                    category.name,
                    category.title,
                    viewed,
                    category.pages.len()
                );
            }
        }

        Commands::Cards { category } => {
            let viewer = open_viewer(&config);
            for card in viewer.card_list(&category)? {
                let marker = if card.viewed { "✔" } else { " " };
                println!("{} {:<22} page {}", marker, card.label, card.page_number);
            }
        }

        Commands::Render {
            category,
            card,
            output,
            width,
        } => {
            let mut viewer = open_viewer(&config);

            let ticket = if viewer.catalog().category(&category)?.is_instructions() {
                let page_number = viewer
                    .catalog()
                    .category(&category)?
                    .page_for(card)
                    .with_context(|| format!("No instruction page {}", card))?;
                viewer.request(DisplayTarget::Instructions, page_number)
            } else {
                viewer.open_card(&category, card)?
            };

            let loaders = PdfiumLoader::strategies(&config.pdf_path);
            let document = load_document(&loaders).await.with_context(|| {
                format!(
                    "Failed to load {}. Check the file and the pdfium installation",
                    config.pdf_path.display()
                )
            })?;

            match viewer.show(&document, ticket, width).await {
                DisplayOutcome::Displayed { page_number, .. } => {
                    let shown = viewer
                        .display(ticket.target)
                        .shown()
                        .context("Rendered page went missing")?;
                    let surface = &shown.surface;
                    let image = image::RgbaImage::from_raw(
                        surface.width as u32,
                        surface.height as u32,
                        surface.rgba_data.clone(),
                    )
                    .context("Rendered surface has an unexpected size")?;
                    image.save(&output)?;
                    println!(
                        "Rendered page {} ({}x{}) → {}",
                        page_number,
                        surface.width,
                        surface.height,
                        output.display()
                    );
                }
                DisplayOutcome::Failed(e) => bail!(e),
                DisplayOutcome::Stale => bail!("Render of page {} was superseded", ticket.page_number),
            }

            viewer.shutdown();
        }

        Commands::Viewed => {
            let viewer = open_viewer(&config);
            let pages: Vec<String> = viewer.viewed().pages().map(|p| p.to_string()).collect();
            if pages.is_empty() {
                println!("No cards viewed yet");
            } else {
                println!("Viewed pages: {}", pages.join(", "));
            }
        }

        Commands::Reset => {
            let mut viewer = open_viewer(&config);
            let count = viewer.viewed().len();
            viewer.reset_viewed();
            println!("Reset {} viewed card(s)", count);
        }

        Commands::Check => {
            let loaders = PdfiumLoader::strategies(&config.pdf_path);
            let document = load_document(&loaders).await?;
            let page_count = document.page_count();
            let missing = config.catalog.out_of_range_pages(page_count);

            println!("{}: {} pages", config.pdf_path.display(), page_count);
            if !missing.is_empty() {
                bail!("Catalog references missing page(s): {:?}", missing);
            }
            println!("All catalog pages are present");
        }

        Commands::InitConfig { output } => {
            config.save(&output).await?;
            println!("Wrote configuration → {}", output.display());
        }
    }

    Ok(())
}
