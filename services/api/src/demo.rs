use crate::infra::{InMemorySourcingRepository, StaticSupplierDirectory};
use chrono::{Duration, Utc};
use clap::Args;
use fmops::error::AppError;
use fmops::workflows::sourcing::{
    EvaluationWeights, QuoteSubmission, RfqDraft, SourcingService, SupplierId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Weight on the relative price score
    #[arg(long)]
    pub(crate) weight_price: Option<u32>,
    /// Weight on the declared quality score
    #[arg(long)]
    pub(crate) weight_quality: Option<u32>,
    /// Weight on the lead-time score
    #[arg(long)]
    pub(crate) weight_delivery: Option<u32>,
    /// Weight on the compliance/ESG score
    #[arg(long)]
    pub(crate) weight_compliance: Option<u32>,
    /// Stop after benchmarking instead of awarding the top-ranked supplier.
    #[arg(long)]
    pub(crate) skip_award: bool,
}

/// Run the sourcing workflow end to end against the in-memory store and
/// print each step, so the flow can be inspected without an HTTP client.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let defaults = EvaluationWeights::default();
    let weights = EvaluationWeights {
        price: args.weight_price.unwrap_or(defaults.price),
        quality: args.weight_quality.unwrap_or(defaults.quality),
        delivery: args.weight_delivery.unwrap_or(defaults.delivery),
        compliance: args.weight_compliance.unwrap_or(defaults.compliance),
    };

    let service = SourcingService::new(
        Arc::new(InMemorySourcingRepository::default()),
        Arc::new(StaticSupplierDirectory::seeded()),
    )
    .with_default_weights(weights);

    println!("Supplier sourcing demo");
    println!(
        "Weights: price {} / quality {} / delivery {} / compliance {}",
        weights.price, weights.quality, weights.delivery, weights.compliance
    );

    let rfq = match service.create_rfq(RfqDraft {
        title: "HVAC maintenance, Hamburg campus".to_string(),
        description: Some("Quarterly maintenance of 12 rooftop units".to_string()),
        customer_ref: Some("cust-204".to_string()),
        site_ref: Some("site-hh-01".to_string()),
        category_ref: Some("cat-hvac".to_string()),
        deadline: Some(Utc::now() + Duration::days(14)),
        weights: None,
    }) {
        Ok(rfq) => rfq,
        Err(err) => {
            println!("  RFQ creation failed: {err}");
            return Ok(());
        }
    };
    println!("\n- Created {} ({})", rfq.number, rfq.title);

    let invitees = ["sup-nordklima", "sup-hanse", "sup-stadtwerk"];
    for supplier in invitees {
        match service.invite_supplier(&rfq.id, &SupplierId(supplier.to_string())) {
            Ok(invitation) => println!("- Invited {} ({})", supplier, invitation.id),
            Err(err) => println!("- Invitation for {supplier} failed: {err}"),
        }
    }

    match service.send(&rfq.id) {
        Ok(sent) => println!("- Sent to {} suppliers, status {}", invitees.len(), sent.status),
        Err(err) => {
            println!("- Send failed: {err}");
            return Ok(());
        }
    }

    let bids: [(&str, f64, u32, u8, u8, u8); 3] = [
        ("sup-nordklima", 100_000.0, 10, 80, 70, 70),
        ("sup-hanse", 90_000.0, 20, 60, 60, 60),
        ("sup-stadtwerk", 120_000.0, 5, 90, 90, 90),
    ];
    println!("\nQuote intake");
    for (supplier, price, days, quality, compliance, esg) in bids {
        let submission = QuoteSubmission {
            supplier_id: SupplierId(supplier.to_string()),
            total_price: price,
            currency: "EUR".to_string(),
            delivery_days: Some(days),
            validity_days: Some(60),
            quality_score: Some(quality),
            compliance_score: Some(compliance),
            esg_score: Some(esg),
        };
        match service.submit_quote(&rfq.id, submission) {
            Ok(quote) => println!(
                "- {} bid {:.2} {} ({} days lead time) -> {}",
                supplier, price, quote.currency, days, quote.number
            ),
            Err(err) => println!("- Quote from {supplier} rejected: {err}"),
        }
    }

    let ranked = match service.calculate_benchmarks(&rfq.id) {
        Ok(ranked) => ranked,
        Err(err) => {
            println!("\nBenchmarking unavailable: {err}");
            return Ok(());
        }
    };
    println!("\nBenchmark ranking");
    for quote in &ranked {
        println!(
            "  #{} {} | benchmark {} | price rank {}",
            quote.overall_rank.unwrap_or_default(),
            quote.supplier_id,
            quote
                .benchmark_score
                .map(|score| format!("{score:.2}"))
                .unwrap_or_else(|| "n/a".to_string()),
            quote.price_rank.unwrap_or_default(),
        );
    }

    if args.skip_award {
        println!("\nAward skipped on request; RFQ left in evaluation.");
        return Ok(());
    }

    let Some(winner) = ranked.first().map(|quote| quote.supplier_id.clone()) else {
        println!("\nNo quotes to award.");
        return Ok(());
    };
    match service.award(
        &rfq.id,
        &winner,
        "top benchmark across price and delivery".to_string(),
    ) {
        Ok(awarded) => {
            println!("\nAwarded {} to {}", awarded.number, winner);
            match serde_json::to_string_pretty(&awarded) {
                Ok(json) => println!("Final RFQ record:\n{json}"),
                Err(err) => println!("Final RFQ record unavailable: {err}"),
            }
        }
        Err(err) => println!("\nAward failed: {err}"),
    }

    Ok(())
}
