use crate::error::{ApiError, ApiResult};
use crate::sheets::LogRow;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use starpair_ai::NarrativeSource;
use starpair_core::{horoscope, DailyHoroscope, NarrativeBundle, Person, PersonInput, Sign};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub person1: Option<PersonInput>,
    #[serde(default)]
    pub person2: Option<PersonInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub person1: Person,
    pub person2: Person,
    pub horoscope1: DailyHoroscope,
    pub horoscope2: DailyHoroscope,
    pub compatibility_analysis: NarrativeBundle,
    pub analysis_source: NarrativeSource,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HoroscopeResponse {
    pub success: bool,
    pub sign: Sign,
    pub data: DailyHoroscope,
}

fn present(person: Option<PersonInput>) -> Option<PersonInput> {
    person.filter(|p| !p.is_empty())
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload?;
    let (Some(input1), Some(input2)) = (present(request.person1), present(request.person2)) else {
        return Err(ApiError::BadRequest("Missing person data".to_string()));
    };

    let person1 = input1.resolve();
    let person2 = input2.resolve();

    let now = Local::now();
    let today = now.date_naive();
    let horoscope1 = horoscope(person1.zodiac_sign, today);
    let horoscope2 = horoscope(person2.zodiac_sign, today);

    let analysis = state
        .analyzer
        .analyze(&person1, &person2, &horoscope1, &horoscope2)
        .await;

    info!(
        sign1 = %person1.zodiac_sign,
        sign2 = %person2.zodiac_sign,
        score = analysis.bundle.compatibility_score,
        source = %analysis.source,
        "Analysis complete"
    );

    if let Some(sink) = state.log_sink.clone() {
        let row = LogRow::new(&person1, &person2, &analysis.bundle, now);
        tokio::spawn(async move {
            if let Err(e) = sink.append(&row).await {
                warn!(error = %e, "Failed to log analysis");
            }
        });
    }

    Ok(Json(AnalyzeResponse {
        success: true,
        person1,
        person2,
        horoscope1,
        horoscope2,
        compatibility_analysis: analysis.bundle,
        analysis_source: analysis.source,
        timestamp: now.to_rfc3339(),
    }))
}

pub async fn get_horoscope(Path(sign): Path<String>) -> ApiResult<Json<HoroscopeResponse>> {
    let sign: Sign = sign.parse()?;
    let data = horoscope(sign, Local::now().date_naive());
    Ok(Json(HoroscopeResponse {
        success: true,
        sign,
        data,
    }))
}
