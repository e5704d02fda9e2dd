//! Trains the baseline SIN tagger on the authored examples, then reports span-level precision,
//! recall and F1 on the held-out split.

use clap::Parser;
use log::{info, warn};
use sinev::{
    alignment_tags, evaluate, evaluation_examples, evaluation_report, training_examples,
    Predictor, ShapeTrainer, TokenTag, TrainerConfig,
};
use std::error::Error;

#[derive(Debug, Parser)]
#[command(about = "Train the baseline SIN tagger and report span-level metrics")]
struct Args {
    /// Skip the BILOU alignment check of the authored examples.
    #[arg(long)]
    skip_alignment: bool,
    /// Print the alignment tags and the predicted spans of every sentence.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let training = training_examples();
    let held_out = evaluation_examples();

    if !args.skip_alignment {
        for example in training.iter().chain(held_out.iter()) {
            let tags = alignment_tags(example);
            if tags.iter().any(|t| matches!(t, TokenTag::Misaligned)) {
                warn!("misaligned gold span in {:?}", example.text());
            }
            if args.verbose {
                let rendered: Vec<String> = tags.iter().map(ToString::to_string).collect();
                println!("{:?}: {}", example.text(), rendered.join(" "));
            }
        }
    }

    info!("training on {} examples", training.len());
    let model = ShapeTrainer::new(TrainerConfig::default()).train(&training)?;
    info!("learned {} shapes", model.len());

    if args.verbose {
        for example in &held_out {
            let mut predicted: Vec<String> = model
                .predict(example.text())
                .iter()
                .map(ToString::to_string)
                .collect();
            predicted.sort();
            println!("{:?} -> [{}]", example.text(), predicted.join(", "));
        }
    }

    println!("{}", evaluation_report(&held_out, &model));
    println!("{}", evaluate(&held_out, &model));
    Ok(())
}
