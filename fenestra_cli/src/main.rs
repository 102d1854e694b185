//! # Fenestra CLI Application
//!
//! Terminal front end for the quotation engine: quote single windows,
//! inspect catalogs and price multi-item client projects.

mod seed;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use fenestra_core::bom::CalculationResult;
use fenestra_core::calculations::WindowConfig;
use fenestra_core::catalog::CatalogSnapshot;
use fenestra_core::file_io::{
    create_project, load_catalog, load_project, load_project_with_lock_check, load_settings, save_catalog,
    save_project, FileLock,
};
use fenestra_core::project::{ProjectQuote, QuoteProject};
use fenestra_core::units::round_currency;
use fenestra_core::{calculate, CalcError, CalcResult, EngineSettings, OpeningType};

use seed::SAMPLE_CATALOG;

#[derive(Parser)]
#[command(name = "fenestra", version, about = "Window and door quotation engine")]
struct Cli {
    /// Catalog JSON file. Uses the built-in sample catalog when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Engine settings TOML file.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a single window or door.
    Calculate {
        #[command(flatten)]
        window: WindowArgs,

        /// Print the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List the systems, glass and hardware of the catalog.
    Catalog,

    /// Write the built-in sample catalog as JSON.
    SampleCatalog {
        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Manage and price a quote project (.fnq).
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Create an empty project file.
    New {
        path: PathBuf,
        #[arg(long)]
        client: String,
        #[arg(long)]
        reference: String,
        /// Client-specific margin in percent.
        #[arg(long)]
        margin: Option<f64>,
        /// Replace an existing project file.
        #[arg(long)]
        force: bool,
    },
    /// Add a window to a project.
    Add {
        path: PathBuf,
        /// Item label (e.g., "W-01 Kitchen").
        #[arg(long)]
        label: String,
        /// Identical units on this line.
        #[arg(long, default_value = "1")]
        units: u32,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Price every item of a project.
    Quote {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

/// Window configuration, from a JSON file or from individual flags.
#[derive(Args)]
struct WindowArgs {
    /// WindowConfig JSON file. Individual flags are ignored when given.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overall width in mm.
    #[arg(long, required_unless_present = "config")]
    width: Option<f64>,

    /// Overall height in mm.
    #[arg(long, required_unless_present = "config")]
    height: Option<f64>,

    /// casement, awning, turn-tilt, sliding or folding.
    #[arg(long, value_parser = parse_opening, required_unless_present = "config")]
    opening: Option<OpeningType>,

    /// Material system id.
    #[arg(long, required_unless_present = "config")]
    system: Option<String>,

    /// Glass id.
    #[arg(long, required_unless_present = "config")]
    glass: Option<String>,

    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    leaves: i32,

    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    mullions: i32,

    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    transoms: i32,
}

fn parse_opening(s: &str) -> Result<OpeningType, String> {
    OpeningType::from_str_flexible(s).map_err(|e| e.to_string())
}

fn missing(flag: &str) -> CalcError {
    CalcError::invalid_input(flag, "", "Required unless --config is given")
}

impl WindowArgs {
    fn into_config(self) -> CalcResult<WindowConfig> {
        if let Some(path) = self.config {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
            return serde_json::from_str(&text).map_err(|e| CalcError::serialization(e.to_string()));
        }

        Ok(WindowConfig {
            width: self.width.ok_or_else(|| missing("width"))?,
            height: self.height.ok_or_else(|| missing("height"))?,
            opening_type: self.opening.ok_or_else(|| missing("opening"))?,
            system_id: self.system.ok_or_else(|| missing("system"))?,
            glass_id: self.glass.ok_or_else(|| missing("glass"))?,
            leaves: self.leaves,
            mullions: self.mullions,
            transoms: self.transoms,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => EngineSettings::default(),
    };

    match cli.command {
        Commands::Calculate { window, json } => {
            let catalog = open_catalog(cli.catalog.as_deref())?;
            let config = window.into_config()?;
            let result = calculate(&config, &*catalog, &settings)?;
            if json {
                print_json(&result.rounded(settings.labor_rate))?;
            } else {
                print_result(&config, &result, settings.labor_rate);
            }
        }

        Commands::Catalog => {
            let catalog = open_catalog(cli.catalog.as_deref())?;
            print_catalog(&catalog);
        }

        Commands::SampleCatalog { output } => match output {
            Some(path) => {
                save_catalog(&SAMPLE_CATALOG, &path)?;
                println!("Sample catalog written to {}", path.display());
            }
            None => print_json(&*SAMPLE_CATALOG)?,
        },

        Commands::Project { action } => run_project(action, cli.catalog.as_deref(), &settings)?,
    }
    Ok(())
}

fn run_project(action: ProjectAction, catalog_path: Option<&Path>, settings: &EngineSettings) -> CalcResult<()> {
    match action {
        ProjectAction::New {
            path,
            client,
            reference,
            margin,
            force,
        } => {
            let _lock = FileLock::acquire(&path, user_id())?;
            let mut project = QuoteProject::new(client, reference);
            project.margin_percent = margin;
            if force {
                save_project(&project, &path)?;
            } else {
                create_project(&project, &path)?;
            }
            println!("Created project {} at {}", project.meta.reference, path.display());
        }

        ProjectAction::Add {
            path,
            label,
            units,
            window,
        } => {
            let config = window.into_config()?;
            let _lock = FileLock::acquire(&path, user_id())?;
            let mut project = load_project(&path)?;
            let id = project.add_item(label, config);
            if let Some(item) = project.get_item_mut(&id) {
                item.units = units;
            }
            save_project(&project, &path)?;
            println!("Added item {} ({} items)", id, project.item_count());
        }

        ProjectAction::Quote { path, json } => {
            let catalog = open_catalog(catalog_path)?;
            let (project, lock_info) = load_project_with_lock_check(&path)?;
            if let Some(info) = lock_info {
                tracing::warn!(
                    path = %path.display(),
                    holder = %info.user_id,
                    machine = %info.machine,
                    since = %info.locked_at.to_rfc3339(),
                    "project is being edited; quoting the last saved state"
                );
            }
            let quote = project.calculate_all(&*catalog, settings);
            if json {
                print_json(&quote_json(&quote, settings.labor_rate))?;
            } else {
                print_quote(&project, &quote, settings.labor_rate);
            }
        }
    }
    Ok(())
}

fn open_catalog(path: Option<&Path>) -> CalcResult<Cow<'static, CatalogSnapshot>> {
    match path {
        Some(path) => load_catalog(path).map(Cow::Owned),
        None => {
            tracing::debug!("using built-in sample catalog");
            Ok(Cow::Borrowed(&*SAMPLE_CATALOG))
        }
    }
}

fn user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "fenestra".to_string())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Unit price and line total as shown: the rounded unit price times units.
fn shown_price(result: &CalculationResult, units: u32, labor_rate: f64) -> (f64, f64) {
    let unit_price = result.rounded(labor_rate).final_price;
    (unit_price, round_currency(unit_price * f64::from(units)))
}

fn shown_total(quote: &ProjectQuote, labor_rate: f64) -> f64 {
    let total = quote
        .lines
        .iter()
        .filter_map(|line| line.result.as_ref().ok().map(|result| (result, line.units)))
        .map(|(result, units)| shown_price(result, units, labor_rate).1)
        .sum();
    round_currency(total)
}

fn quote_json(quote: &ProjectQuote, labor_rate: f64) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = quote
        .lines
        .iter()
        .map(|line| match &line.result {
            Ok(result) => serde_json::json!({
                "id": line.id,
                "label": line.label,
                "units": line.units,
                "result": result.rounded(labor_rate),
            }),
            Err(e) => serde_json::json!({
                "id": line.id,
                "label": line.label,
                "units": line.units,
                "error": e,
            }),
        })
        .collect();

    serde_json::json!({
        "lines": lines,
        "total_price": shown_total(quote, labor_rate),
    })
}

fn print_result(config: &WindowConfig, result: &CalculationResult, labor_rate: f64) {
    let shown = result.rounded(labor_rate);

    println!("═══════════════════════════════════════════════════════════════════════");
    println!(
        "  {} {} x {} mm  ({} / {})",
        config.opening_type.display_name(),
        config.width,
        config.height,
        config.system_id,
        config.glass_id
    );
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    println!(
        "  {:<9} {:<34} {:>8} {:<3} {:>9} {:>9}",
        "Type", "Description", "Qty", "", "Unit", "Total"
    );
    for item in &shown.bom_items {
        println!(
            "  {:<9} {:<34} {:>8.3} {:<3} {:>9.2} {:>9.2}",
            item.item_type.display_name(),
            item.description,
            item.quantity,
            item.unit,
            item.unit_cost,
            item.total_cost
        );
    }
    println!();
    println!("  Materials:   {:>10.2}", shown.total_material_cost);
    println!("  Labor:       {:>10.2}", shown.labor_cost);
    println!(
        "  Margin:      {:>10.2}  ({}%)",
        round_currency(shown.margin_amount()),
        shown.margin_percent
    );
    println!("───────────────────────────────────────────────────────────────────────");
    println!("  FINAL PRICE: {:>10.2}", shown.final_price);
    println!();
    println!("  Glass area: {:.3} m²   Weight: {:.2} kg", shown.glass_area, shown.weight);
}

fn print_quote(project: &QuoteProject, quote: &ProjectQuote, labor_rate: f64) {
    println!("Quote {} for {}", project.meta.reference, project.meta.client);
    println!();
    for line in &quote.lines {
        match &line.result {
            Ok(result) => {
                let (unit_price, line_total) = shown_price(result, line.units, labor_rate);
                println!(
                    "  {:<24} {:>3} x {:>10.2} = {:>10.2}",
                    line.label, line.units, unit_price, line_total
                );
            }
            Err(e) => println!("  {:<24} FAILED: {}", line.label, e),
        }
    }
    println!();
    println!(
        "  TOTAL ({}): {:.2}",
        project.meta.currency,
        shown_total(quote, labor_rate)
    );
    let failed = quote.failures().count();
    if failed > 0 {
        println!("  {} item(s) could not be priced", failed);
    }
}

fn print_catalog(catalog: &CatalogSnapshot) {
    println!("Material systems:");
    for system in &catalog.systems {
        let openings: Vec<&str> = system.compatible_openings.iter().map(|o| o.display_name()).collect();
        println!(
            "  {:<10} {:<16} {:<9} {}",
            system.id,
            system.name,
            system.kind.display_name(),
            openings.join(", ")
        );
        for profile in catalog.profiles.iter().filter(|p| p.system_id == system.id) {
            println!(
                "      {:<8} {:<10} {:>7.2}/m  {:>4.1} kg/m",
                profile.role.display_name(),
                profile.code,
                profile.cost_per_m,
                profile.weight_per_m
            );
        }
    }

    println!();
    println!("Glass:");
    for glass in &catalog.glass {
        println!(
            "  {:<16} {:<22} {:>4} mm  U={:<4} {:>7.2}/m²",
            glass.id, glass.description, glass.thickness_mm, glass.u_value, glass.cost_per_m2
        );
    }

    println!();
    println!("Hardware:");
    for hw in &catalog.hardware {
        println!(
            "  {:<20} {:<24} {:<7} {:>7.2}",
            hw.id,
            hw.name,
            hw.category.code(),
            hw.unit_cost
        );
    }
}
