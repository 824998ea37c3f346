//! LLM-driven prompt refinement for Promptsy.
//!
//! - [`PromptEnhancer`]: rewrite a prompt into a better version of itself
//! - [`FewShotGenerator`]: generate question/answer examples, fold them into
//!   the template, reformat the result and persist it
//!
//! # Example
//! ```no_run
//! use promptsy_core::AppConfig;
//! use promptsy_llm::client_from_config;
//! use promptsy_prompt::PromptRecord;
//! use promptsy_refine::{FewShotGenerator, FewShotOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let client = client_from_config(&config)?;
//! let generator = FewShotGenerator::from_config(&config, client)?;
//!
//! let prompt = PromptRecord::new(
//!     "sentiment_analysis",
//!     "make a sentiment analysis prompt",
//!     "Classify the sentiment of the following text: {text}",
//! )?;
//! let options = FewShotOptions::new(3).with_expected_outputs(["negative", "positive", "neutral"]);
//! let outcome = generator.generate(&prompt, &options).await?;
//! println!("{}", outcome.prompt.template());
//! # Ok(())
//! # }
//! ```

pub mod enhancer;
pub mod example;
pub mod few_shot;

pub use enhancer::PromptEnhancer;
pub use example::Example;
pub use few_shot::{
    assemble_few_shot_prompt, FewShotGenerator, FewShotInstructions, FewShotOptions,
    FewShotOutcome,
};
