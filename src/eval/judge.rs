#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The API judge: grades a submitted answer by showing the question image
//! and both answers to a vision model and asking for a verdict.
//!
//! The model is never asked to solve the question, only to compare the
//! submitted answer against the ground truth, which tolerates paraphrased
//! short answers that the rules matcher would reject.

use std::path::Path;

use anyhow::{Context, Result};
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessageContentPartImage, ChatCompletionRequestMessageContentPartText,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequest, ImageUrl,
    },
};
use base64::{Engine as _, engine::general_purpose};

use crate::{config::JudgeConfig, dataset::Question};

/// Reply that marks a submission as correct. Anything else is incorrect.
pub const CORRECT_REPLY: &str = "Correct.";

/// Reply recorded when a submission is rejected.
pub const INCORRECT_REPLY: &str = "Incorrect.";

/// Grades answers through an OpenAI-compatible chat endpoint.
pub struct ApiJudge {
    /// Configured chat client.
    client: OpenAIClient<OpenAIConfig>,
    /// Model identifier sent with every request.
    model:  String,
}

impl ApiJudge {
    /// Creates a judge from validated credentials.
    pub fn new(config: &JudgeConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key().to_owned());
        if let Some(api_base) = config.api_base() {
            openai_config = openai_config.with_api_base(api_base.to_owned());
        }

        Self {
            client: OpenAIClient::with_config(openai_config),
            model:  config.model().to_owned(),
        }
    }

    /// Asks the model whether `submitted` matches the question's ground
    /// truth and returns its raw reply.
    pub async fn judge(
        &self,
        question: &Question,
        submitted: &str,
        image: &Path,
    ) -> Result<String> {
        let bytes = tokio::fs::read(image)
            .await
            .with_context(|| format!("Could not read question image {}", image.display()))?;
        let data_url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(bytes)
        );

        let content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: judge_prompt(&question.answer, submitted),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url:    data_url,
                        detail: None,
                    },
                },
            ),
        ];

        let messages = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(
                    content_parts,
                ))
                .build()?
                .into(),
        ];

        let response = self
            .client
            .chat()
            .create(CreateChatCompletionRequest {
                model: self.model.clone(),
                messages,
                n: Some(1),
                stream: Some(false),
                ..Default::default()
            })
            .await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No content in judge response"))
    }
}

/// Builds the grading prompt for one question.
fn judge_prompt(answer: &str, response: &str) -> String {
    format!(
        "## Answer\n{answer}\n\n## Student's submitted solution\n{response}\n\nYou are an AI \
         responsible for grading exam answers.\nCompare the correct answer with the solution \
         submitted by students.\nIf they match, respond with \"Correct.\" If they do not match, \
         respond with \"Incorrect.\"\nYou are not solving the question; you are only comparing \
         the given correct answer with the student's solution."
    )
}
