use tracing::{trace, Level};
use tracing_subscriber::fmt;

use stat_translations::{InputValue, Parser, TranslateOptions};

const SAMPLE: &str = r#"
description
    1 life_regeneration_rate_per_minute
    1
        # "%1% Life Regenerated per minute"

description
    1 physical_damage_reduction_%
    3
        # "%1%% reduced Physical Damage taken"
        100|# "Immune to Physical Damage"
        #|0 "Chance to take increased Physical Damage"

description
    1 cold_damage_taken_%
    1
        # "%1%% increased Cold Damage taken" negate 1
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let span = tracing::span!(Level::TRACE, "stat_translate_demo");
    let _enter = span.enter();
    let collector = fmt::Subscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(collector, || {
        let file = Parser::new().parse(SAMPLE).expect("sample file parses");

        for diagnostic in file.diagnostics() {
            trace!(target: "stat-translate-demo", %diagnostic, "diagnostic raised while loading sample");
        }

        let result = file
            .translate(
                &["life_regeneration_rate_per_minute".to_string()],
                &[InputValue::Scalar(12)],
                &TranslateOptions::default(),
            )
            .expect("well-formed query");
        for line in &result.lines {
            println!("{}", line);
        }

        let result = file
            .translate(
                &["physical_damage_reduction_%".to_string()],
                &[InputValue::Scalar(100)],
                &TranslateOptions::default(),
            )
            .expect("well-formed query");
        for line in &result.lines {
            println!("{}", line);
        }

        let result = file
            .translate(
                &["cold_damage_taken_%".to_string()],
                &[InputValue::Scalar(-20)],
                &TranslateOptions::default(),
            )
            .expect("well-formed query");
        for line in &result.lines {
            println!("{}", line);
        }
    });

    Ok(())
}
