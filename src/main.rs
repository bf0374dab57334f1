use clap::{Parser, Subcommand};
use dotnav_gallery::collect::Collection;
use dotnav_gallery::lightbox::LightboxError;
use dotnav_gallery::static_page::StaticPage;
use dotnav_gallery::types::Variant;
use dotnav_gallery::{carousel, collect, config, contract, markup, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dotnav-gallery")]
#[command(about = "Inspect pages that use the dot-navigation gallery widget")]
#[command(long_about = "\
Inspect pages that use the dot-navigation gallery widget

The widget itself runs in the browser (build with --features web). This tool
reads a saved page and shows what the widget would see: the galleries it
finds, the slides it collects, and any markup that breaks its contract.

Expected markup (inline family, stock class names):

  <div class=\"dotnav-gallery-iner\">
    <div class=\"dotnav-gallery-container-iner\">
      <div class=\"dotnav-gallery-slide-iner\" style=\"background-image: url('a.jpg')\">
        <div class=\"dotnav-gallery-caption-iner\">Caption</div>
      </div>
    </div>
    <button class=\"prev-btn-iner\"></button>
    <button class=\"next-btn-iner\"></button>
    <div class=\"dotnav-gallery-dots-iner\"></div>
  </div>
  <button class=\"open-full-gallery-btn\">View all</button>

Run 'dotnav-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Widget config (class names, timings); stock defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the galleries and slides on a page
    Scan {
        page: PathBuf,
        /// Print the collected slides as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a page's gallery markup
    Check { page: PathBuf },
    /// Print the lightbox overlay the page's inline slides produce
    Lightbox {
        page: PathBuf,
        /// Slide to open the overlay at
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn read_page(path: &Path) -> Result<StaticPage, std::io::Error> {
    Ok(StaticPage::parse(&std::fs::read_to_string(path)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { page, json } => {
            let config = config::load_config(cli.config.as_deref())?;
            let page = read_page(&page)?;
            let collections: Vec<(Variant, Collection)> = Variant::ALL
                .into_iter()
                .map(|v| (v, collect::collect(&page, config.variant(v))))
                .collect();
            if json {
                let mut by_variant = serde_json::Map::new();
                for (variant, collection) in &collections {
                    by_variant.insert(
                        variant.label().to_string(),
                        serde_json::to_value(collection)?,
                    );
                }
                println!("{}", serde_json::to_string_pretty(&by_variant)?);
            } else {
                output::print_scan_output(&collections);
            }
        }
        Command::Check { page } => {
            let config = config::load_config(cli.config.as_deref())?;
            let audit = contract::audit(&read_page(&page)?, &config);
            output::print_check_output(&audit);
            if audit.has_errors() {
                std::process::exit(1);
            }
        }
        Command::Lightbox { page, index } => {
            let config = config::load_config(cli.config.as_deref())?;
            let slides = collect::collect(&read_page(&page)?, &config.inline).slides();
            if slides.is_empty() {
                return Err(LightboxError::NoSlides.into());
            }
            if index >= slides.len() {
                return Err(carousel::NavigationError::OutOfRange {
                    index,
                    len: slides.len(),
                }
                .into());
            }
            println!("{}", markup::lightbox_overlay(&slides, index).to_html());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
