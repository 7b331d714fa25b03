//! # Estimator CLI
//!
//! Minimal interactive front-end for the estimation engine: prompts for
//! the dimensions of one item of work, links it to a standard rate, and
//! prints the resulting abstract and general abstract. Stands in for the
//! form/import collaborator the core is designed to sit behind.

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;

use estimate_core::abstracts::AbstractFields;
use estimate_core::measurement::MeasurementFields;
use estimate_core::Estimate;

fn prompt_decimal(prompt: &str, default: Decimal) -> Decimal {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() {
    println!("Estimator CLI - Construction Cost Estimation");
    println!("============================================");
    println!();
    println!("Demo: one part, one brickwork item priced at SSR 13.1.1.");
    println!();

    let multiplier = prompt_decimal("Number of items (nos) [2]: ", Decimal::from(2));
    let length = prompt_decimal("Length (m) [10]: ", Decimal::from(10));
    let breadth = prompt_decimal("Breadth (m) [5]: ", Decimal::from(5));
    let height = prompt_decimal("Height (m) [3]: ", Decimal::from(3));

    let mut estimate = Estimate::with_standard_rates("CLI Demo", "estimator", "Demo Client");

    let result = estimate.add_part("Ground Floor").and_then(|_| {
        let m_id = estimate.add_measurement_line(
            "Ground Floor",
            MeasurementFields {
                rate_code: Some("13.1.1".to_string()),
                label: "Brick masonry in superstructure".to_string(),
                multiplier,
                length,
                breadth,
                height,
                unit: "cum".to_string(),
            },
        )?;
        estimate.add_abstract_line(
            "Ground Floor",
            AbstractFields {
                rate_code: Some("13.1.1".to_string()),
                ..Default::default()
            },
            Some(m_id),
        )
    });

    match result {
        Ok(_) => {
            let part = estimate
                .part("Ground Floor")
                .expect("part was just created");
            let general = estimate.general_abstract();

            println!();
            println!("═══════════════════════════════════════");
            println!("  GROUND FLOOR - ABSTRACT OF COST");
            println!("═══════════════════════════════════════");
            for line in part.abstracts.iter() {
                println!(
                    "  {:<40} {:>10} {:<5} @ {:>10} = {:>14}",
                    line.description, line.quantity, line.unit, line.rate, line.amount
                );
            }
            println!("  Part subtotal: {}", part.subtotal);
            println!();
            println!("═══════════════════════════════════════");
            println!("  GENERAL ABSTRACT");
            println!("═══════════════════════════════════════");
            for entry in &general.part_totals {
                println!("  {:<40} {:>14}", entry.name, entry.subtotal);
            }
            println!("  Subtotal:                  {:>14}", general.subtotal);
            println!(
                "  After electrification @{}%: {:>14}",
                general.electrification_percent.value(),
                general.electrified_total
            );
            println!(
                "  Grand total (prorata @{}%): {:>14}",
                general.prorata_percent.value(),
                general.grand_total
            );
            println!("═══════════════════════════════════════");

            println!();
            println!("JSON snapshot (for export collaborators):");
            if let Ok(json) = serde_json::to_string_pretty(general) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            std::process::exit(1);
        }
    }
}
