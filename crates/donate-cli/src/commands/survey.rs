use anyhow::Result;
use donate_config::Config;
use donate_core::{MovementAnswer, ProtestAnswer, Survey, SurveyChoice};
use donate_engine::DonationEngine;

use crate::cli::SurveyArgs;
use crate::commands::open_storage;

pub async fn handle(config: &Config, args: SurveyArgs) -> Result<()> {
    if args.choice != SurveyChoice::Yes {
        println!("Thank you! Your response has been recorded.");
        return Ok(());
    }

    let survey = build_survey(args);
    let engine = DonationEngine::new(config.clone())?;
    let storage = open_storage(config).await?;
    let file = engine.submit_survey(&survey, &storage).await?;

    println!("✓ Survey stored as {}", file.name);
    println!("Thank you! Your response has been recorded.");

    Ok(())
}

fn build_survey(args: SurveyArgs) -> Survey {
    let mut survey = Survey::new(args.id, args.platform);

    if args.active_movement {
        survey = survey.with_movement(MovementAnswer {
            from: args.movement_from,
            until: args.movement_until,
            kind: args.movement_kind,
        });
    }

    if args.participated_protest {
        survey = survey.with_protest(ProtestAnswer {
            first: args.protest_first,
            last: args.protest_last,
            reason: args.protest_reason,
        });
    }

    if let Some(post) = args.remembered_post {
        survey = survey.with_remembered_post(post);
    }

    survey
}
