//! Turns fetched NASA results and model prose into one [`Response`].
//!
//! Each usable result becomes a plain-text fact section built from its typed
//! fields. The model is asked to phrase a short answer from the same data, and
//! the fact sections are appended after its prose so result URLs always reach
//! the user. When the model fails the fact sections stand alone.

use std::fmt::Write as _;

use serde::Serialize;
use sky_config::ChatConfig;
use sky_core::intent::IntentKind;
use sky_core::response::{Degradation, FailureKind, Response};
use sky_core::result::{
    ApiResult, ApodResult, EarthImageryResult, MarsPhotosResult, NeoFeedResult,
};
use sky_nasa::FetchError;

use crate::source::LanguageModel;

/// Answer used when there is no data and the model is unavailable.
pub const APOLOGY: &str =
    "Sorry, I couldn't reach NASA or the language model just now. Please try again in a moment.";

/// Result of one sub-fetch, tagged with the intent that asked for it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub kind: IntentKind,
    pub result: Result<ApiResult, FetchError>,
}

/// Formats fact sections and merges them with model prose.
#[derive(Debug, Clone)]
pub struct Composer {
    description_limit: usize,
    max_items: usize,
    facts_only: bool,
    system_prompt: String,
}

impl Composer {
    #[must_use]
    pub fn new(config: &ChatConfig, system_prompt: impl Into<String>) -> Self {
        Self {
            description_limit: config.description_limit,
            max_items: config.max_items,
            facts_only: config.facts_only,
            system_prompt: system_prompt.into(),
        }
    }

    /// Build the final response for `query` from the fetch outcomes.
    ///
    /// Failed and empty results are left out of the text and recorded as
    /// degradations. Never fails.
    pub async fn compose<M: LanguageModel>(
        &self,
        query: &str,
        outcomes: Vec<FetchOutcome>,
        model: &M,
    ) -> Response {
        let mut sources = Vec::new();
        let mut degraded = Vec::new();
        let mut usable = Vec::new();

        for FetchOutcome { kind, result } in outcomes {
            match result {
                Ok(result) if !result.is_empty() => {
                    sources.push(kind);
                    usable.push(result);
                }
                Ok(_) => {
                    tracing::warn!(intent = %kind, "NASA returned no usable data");
                    degraded.push(Degradation {
                        intent: kind,
                        failure: FailureKind::Empty,
                    });
                }
                Err(error) => {
                    tracing::warn!(intent = %kind, %error, "NASA fetch failed");
                    degraded.push(Degradation {
                        intent: kind,
                        failure: error.category(),
                    });
                }
            }
        }

        let text = if usable.is_empty() {
            self.answer_without_data(query, model)
                .await
                .unwrap_or_else(|| APOLOGY.to_string())
        } else {
            let facts = usable
                .iter()
                .map(|r| self.fact_section(r))
                .collect::<Vec<_>>()
                .join("\n\n");
            match self.phrase(query, &usable, model).await {
                Some(prose) => format!("{prose}\n\n{facts}"),
                None => facts,
            }
        };

        Response::new(text, sources, degraded)
    }

    /// Ask the model alone, with no NASA data.
    ///
    /// Returns `None` if the model fails.
    pub async fn answer_without_data<M: LanguageModel>(
        &self,
        query: &str,
        model: &M,
    ) -> Option<String> {
        model
            .complete(query, Some(&self.system_prompt))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "model answer failed"))
            .ok()
    }

    async fn phrase<M: LanguageModel>(
        &self,
        query: &str,
        results: &[ApiResult],
        model: &M,
    ) -> Option<String> {
        if self.facts_only {
            return None;
        }
        let prompt = match build_prompt(query, results) {
            Ok(prompt) => prompt,
            Err(error) => {
                tracing::warn!(%error, "could not serialize results for the model");
                return None;
            }
        };
        model
            .complete(&prompt, Some(&self.system_prompt))
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, "model phrasing failed; answering with facts only");
            })
            .ok()
    }

    /// Plain-text summary of one result.
    #[must_use]
    pub fn fact_section(&self, result: &ApiResult) -> String {
        match result {
            ApiResult::Apod(apod) => self.apod_section(apod),
            ApiResult::MarsPhotos(mars) => self.mars_section(mars),
            ApiResult::NeoFeed(neo) => self.neo_section(neo),
            ApiResult::EarthImagery(earth) => self.earth_section(earth),
        }
    }

    fn apod_section(&self, apod: &ApodResult) -> String {
        let mut out = format!("Astronomy Picture of the Day: \"{}\" ({})", apod.title, apod.date);
        if let Some(url) = &apod.url {
            let label = if apod.media_type.as_deref() == Some("video") { "Video" } else { "Image" };
            let _ = write!(out, "\n{label} URL: {url}");
        }
        if let Some(hd_url) = &apod.hd_url {
            let _ = write!(out, "\nHD image: {hd_url}");
        }
        if let Some(explanation) = &apod.explanation {
            let _ = write!(out, "\nDescription: {}", truncate(explanation, self.description_limit));
        }
        let _ = write!(
            out,
            "\nCredit: {}\nMore at https://apod.nasa.gov/apod/",
            apod.copyright.as_deref().unwrap_or("NASA")
        );
        out
    }

    fn mars_section(&self, mars: &MarsPhotosResult) -> String {
        let mut out = format!(
            "Mars Rover Photos: {} photos from {}",
            mars.total_photos,
            capitalize(mars.rover.as_str())
        );
        match (mars.earth_date, mars.sol) {
            (Some(date), Some(sol)) => {
                let _ = write!(out, ", {date} (Sol {sol})");
            }
            (Some(date), None) => {
                let _ = write!(out, ", {date}");
            }
            (None, Some(sol)) => {
                let _ = write!(out, ", Sol {sol}");
            }
            (None, None) => {}
        }
        for (i, photo) in mars.photos.iter().take(self.max_items).enumerate() {
            let _ = write!(
                out,
                "\n- Photo {}: {} on {} (Sol {})\n  URL: {}",
                i + 1,
                photo.camera,
                photo.earth_date,
                photo.sol,
                photo.img_src
            );
        }
        out.push_str("\nMore at https://mars.nasa.gov/");
        out
    }

    fn neo_section(&self, neo: &NeoFeedResult) -> String {
        let mut out = format!(
            "Near Earth Objects: {} objects between {} and {}. Closest approaches:",
            neo.element_count, neo.start_date, neo.end_date
        );
        for object in neo.objects.iter().take(self.max_items) {
            let diameter = match (object.diameter_min_km, object.diameter_max_km) {
                (Some(min), Some(max)) => format!("{min:.2}-{max:.2} km diameter"),
                _ => "diameter unknown".to_string(),
            };
            let when = object
                .close_approach_date
                .map_or_else(String::new, |d| format!(" on {d}"));
            let hazard = if object.is_potentially_hazardous {
                "potentially hazardous"
            } else {
                "not considered hazardous"
            };
            let _ = write!(
                out,
                "\n- {}: {diameter}, passing{when} at {:.0} km, {hazard}",
                object.name, object.miss_distance_km
            );
        }
        out.push_str("\nSource: NASA Near Earth Object Web Service (NeoWs)");
        out
    }

    fn earth_section(&self, earth: &EarthImageryResult) -> String {
        match earth {
            EarthImageryResult::Epic {
                date,
                image_count,
                images,
            } => {
                let mut out =
                    format!("Earth Imagery (EPIC): {image_count} full-disc images from {date}");
                for image in images.iter().take(self.max_items) {
                    let _ = write!(out, "\n- {}", image.identifier);
                    if let Some(centroid) = image.centroid {
                        let _ = write!(
                            out,
                            ", centred on {:.2}, {:.2}",
                            centroid.lat, centroid.lon
                        );
                    }
                    let _ = write!(out, "\n  URL: {}", image.image_url);
                }
                out
            }
            EarthImageryResult::Landsat {
                date,
                coordinates,
                url,
            } => {
                let mut out = format!(
                    "Earth Imagery (Landsat): {:.4}, {:.4}",
                    coordinates.lat, coordinates.lon
                );
                if let Some(date) = date {
                    let _ = write!(out, ", captured {date}");
                }
                if let Some(url) = url {
                    let _ = write!(out, "\nImage URL: {url}");
                }
                out
            }
        }
    }
}

#[derive(Serialize)]
struct PromptData<'a> {
    results: &'a [ApiResult],
}

fn build_prompt(query: &str, results: &[ApiResult]) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(&PromptData { results })?;
    Ok(format!(
        "User question: {query}\n\nNASA data (JSON):\n{data}\n\n\
         Answer the question in a few sentences using this data. \
         Do not list URLs; they are shown to the user separately."
    ))
}

/// Keep the first `limit` characters, marking the cut with `...`.
fn truncate(text: &str, limit: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
