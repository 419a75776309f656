use crate::models::{CardRequest, ConfirmCardForm, CreateCardForm};
use crate::services::formatter::{format_result, ResultTemplate};
use crate::services::ConfirmOutcome;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use service_core::error::AppError;

#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessTemplate {}

#[derive(Template)]
#[template(path = "failure.html")]
pub struct FailureTemplate {}

/// `POST /CreateCard`: generate art and message, render the result page.
pub async fn create_card(
    State(state): State<AppState>,
    Form(form): Form<CreateCardForm>,
) -> Result<ResultTemplate, AppError> {
    let request = CardRequest::from(form);

    let card = state
        .cards
        .create(&request)
        .await
        .map_err(|e| AppError::BadGateway(format!("Card message could not be generated: {}", e)))?;

    Ok(format_result(card.image_url, card.message_html))
}

/// `POST /ConfirmCard`: store the image and email the card.
///
/// Delivery happens in the background, so the success page only means the
/// card was accepted for sending.
pub async fn confirm_card(
    State(state): State<AppState>,
    Form(form): Form<ConfirmCardForm>,
) -> Response {
    match state.cards.confirm(form.into()).await {
        ConfirmOutcome::Sent { .. } => SuccessTemplate {}.into_response(),
        ConfirmOutcome::InvalidEmail | ConfirmOutcome::UploadFailed(_) => {
            FailureTemplate {}.into_response()
        }
    }
}
