use crate::infra::InMemoryPortfolioRepository;
use clap::Args;
use rent_scenarios::engine::{WaterfallStep, WaterfallStepKind};
use rent_scenarios::error::AppError;
use rent_scenarios::portfolio::{
    seed_sample_portfolio, ScenarioId, ScenarioRecord, ScenarioService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional rent-roll CSV to import into the sample property before
    /// calculating.
    #[arg(long)]
    pub(crate) rent_roll: Option<PathBuf>,
    /// Include the floorplan inventory in the output.
    #[arg(long)]
    pub(crate) list_floorplans: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        rent_roll,
        list_floorplans,
    } = args;

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    let service = Arc::new(ScenarioService::new(repository));
    let seed = seed_sample_portfolio(&service)?;

    println!("Rent scenario demo");

    if let Some(path) = rent_roll {
        let file = std::fs::File::open(&path)?;
        let imported = service.import_rent_roll(&seed.campus_view, file)?;
        println!(
            "Imported {} floorplans from {}",
            imported.len(),
            path.display()
        );
    }

    let property = service.property(&seed.campus_view)?;
    println!(
        "Property: {} ({} floorplans)",
        property.property.name,
        property.floorplans.len()
    );

    if list_floorplans {
        println!("\nFloorplan inventory");
        for record in &property.floorplans {
            let plan = &record.details.floorplan;
            println!(
                "- {} | {} | {} units | {:.0} sqft | base ${:.2} + amenity ${:.2}",
                plan.name,
                plan.unit_type,
                plan.unit_count,
                plan.square_footage,
                plan.base_rent,
                plan.amenity_rent
            );
        }
    }

    let analysis = service.analysis(&seed.analysis)?;
    println!(
        "\nAnalysis: {} ({} scenarios)",
        analysis.analysis.name,
        analysis.scenarios.len()
    );

    let scenarios = service.recalculate_analysis(&seed.analysis)?;
    println!("\nScenario results");
    for scenario in &scenarios {
        render_scenario(scenario);
    }

    render_waterfall(&service, &seed.baseline, &seed.optimistic)?;
    render_waterfall(&service, &seed.baseline, &seed.pessimistic)?;

    Ok(())
}

fn render_scenario(scenario: &ScenarioRecord) {
    match &scenario.results {
        Some(results) => {
            println!(
                "- {}: annual ${:.2} | avg rent ${:.2}/unit | ${:.4}/sqft",
                scenario.name,
                results.total_annual_revenue,
                results.avg_rent_per_unit,
                results.revenue_per_sqft
            );
        }
        None => println!("- {}: not yet calculated", scenario.name),
    }
}

fn render_waterfall<R>(
    service: &ScenarioService<R>,
    baseline: &ScenarioId,
    target: &ScenarioId,
) -> Result<(), AppError>
where
    R: rent_scenarios::portfolio::PortfolioRepository + 'static,
{
    let target_record = service.scenario(target)?;
    let steps = service.waterfall(target, baseline)?;

    println!("\nRevenue bridge: Baseline -> {}", target_record.name);
    for WaterfallStep { label, value, kind } in &steps {
        match kind {
            WaterfallStepKind::Delta => println!("  {label:<26} {value:>+15.2}"),
            _ => println!("  {label:<26} ${value:>14.2}"),
        }
    }
    Ok(())
}
