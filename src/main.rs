//! CLI entry point — config loading, simulation run, report printing.

use std::path::Path;
use std::process;

use ev_tariff_sim::catalog::PlanCatalog;
use ev_tariff_sim::config::SiteConfig;
use ev_tariff_sim::io::export::{export_allocation_csv, export_summary_csv};
use ev_tariff_sim::sim::allocator;
use ev_tariff_sim::sim::optimizer::FeeAdjustment;
use ev_tariff_sim::sim::orchestrator::SimulationOrchestrator;
use ev_tariff_sim::sim::types::Season;

/// Parsed CLI arguments.
struct CliArgs {
    site_path: Option<String>,
    preset: Option<String>,
    catalog_path: Option<String>,
    season_override: Option<Season>,
    optimize: bool,
    allocation_out: Option<String>,
    summary_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("ev-tariff-sim — EV charging site tariff economics simulator");
    eprintln!();
    eprintln!("Usage: ev-tariff-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --site <path>            Load site inputs from TOML config file");
    eprintln!("  --preset <name>          Use a built-in site preset (baseline, flat_load)");
    eprintln!("  --catalog <path>         Load tariff catalog from TOML (default: builtin)");
    eprintln!("  --season <name>          Override display season (spring_fall|summer|winter)");
    eprintln!("  --optimize               Re-price fees toward the target profit, then rerun");
    eprintln!("  --allocation-out <path>  Export hourly allocation CSV for the display season");
    eprintln!("  --summary-out <path>     Export per-plan annual summary CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Serve results over REST after the run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --site or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        site_path: None,
        preset: None,
        catalog_path: None,
        season_override: None,
        optimize: false,
        allocation_out: None,
        summary_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--site" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --site requires a path argument");
                    process::exit(1);
                }
                cli.site_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--catalog" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --catalog requires a path argument");
                    process::exit(1);
                }
                cli.catalog_path = Some(args[i].clone());
            }
            "--season" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --season requires a name argument");
                    process::exit(1);
                }
                match Season::parse(&args[i]) {
                    Some(season) => cli.season_override = Some(season),
                    None => {
                        eprintln!(
                            "error: --season value \"{}\" is not one of spring_fall, summer, winter",
                            args[i]
                        );
                        process::exit(1);
                    }
                }
            }
            "--optimize" => {
                cli.optimize = true;
            }
            "--allocation-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --allocation-out requires a path argument");
                    process::exit(1);
                }
                cli.allocation_out = Some(args[i].clone());
            }
            "--summary-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --summary-out requires a path argument");
                    process::exit(1);
                }
                cli.summary_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_report(orchestrator: &SimulationOrchestrator, season: Season) {
    println!("--- Tariff Plan Comparison (annual) ---");
    let best = orchestrator.best_index();
    for (i, result) in orchestrator.results().iter().enumerate() {
        let marker = if best == Some(i) { "*" } else { " " };
        println!("{marker} {result}");
    }

    if let Some(best_result) = orchestrator.best_plan() {
        println!();
        println!(
            "Best plan: {} (annual profit {:.0})",
            best_result.plan.name, best_result.annual.total_profit
        );
        let monthly = best_result.seasons.get(season);
        println!("--- {season} month under the best plan ---");
        println!("{monthly}");
        for device in &monthly.revenue_by_device {
            println!("  {:<10} revenue {:.0}", device.name, device.revenue);
        }
    }
}

fn main() {
    let cli = parse_args();

    // Load site config: --site takes priority, then --preset, then baseline
    let mut site = if let Some(ref path) = cli.site_path {
        match SiteConfig::from_toml_file(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match SiteConfig::from_preset(name) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        SiteConfig::baseline()
    };

    if let Some(season) = cli.season_override {
        site.site.season = season;
    }

    let errors = site.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Load catalog: --catalog or builtin
    let catalog = if let Some(ref path) = cli.catalog_path {
        match PlanCatalog::from_toml_file(Path::new(path)) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        PlanCatalog::builtin()
    };
    let errors = catalog.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let season = site.site.season;
    let auto_power = site.derives_contract_power();
    let mut orchestrator = SimulationOrchestrator::new(site.to_inputs(), auto_power);
    orchestrator.run(&catalog.plans);

    if cli.optimize {
        match orchestrator.optimize_fees(&catalog.plans) {
            FeeAdjustment::Adjusted { ref fees, revenue_gap } => {
                println!("--- Fee Optimization ---");
                println!("Revenue gap: {revenue_gap:.0}");
                for (device, new_fees) in orchestrator.inputs().devices.iter().zip(fees) {
                    println!(
                        "  {:<10} light {:.0} / mid {:.0} / heavy {:.0}",
                        device.name, new_fees.light, new_fees.mid, new_fees.heavy
                    );
                }
                println!();
            }
            FeeAdjustment::Unchanged => {
                println!("--- Fee Optimization ---");
                println!("Revenue already within tolerance; fees unchanged.");
                println!();
            }
        }
    }

    print_report(&orchestrator, season);

    // Export CSVs if requested; nothing has mutated the inputs since the
    // run, so they match the committed snapshot
    let snapshot = orchestrator.inputs().clone();
    if let Some(ref path) = cli.allocation_out {
        let profile = allocator::hourly_profile(&snapshot, season);
        if let Err(e) = export_allocation_csv(&profile, Path::new(path)) {
            eprintln!("error: failed to write allocation CSV: {e}");
            process::exit(1);
        }
        eprintln!("Allocation profile written to {path}");
    }
    if let Some(ref path) = cli.summary_out {
        if let Err(e) = export_summary_csv(orchestrator.results(), Path::new(path)) {
            eprintln!("error: failed to write summary CSV: {e}");
            process::exit(1);
        }
        eprintln!("Plan summary written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ev_tariff_sim::api::AppState {
            inputs: snapshot,
            results: orchestrator.results().to_vec(),
            best: orchestrator.best_index(),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(ev_tariff_sim::api::serve(state, addr));
    }
}
