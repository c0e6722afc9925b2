use std::path::PathBuf;

use clap::{Args, Subcommand};
use sky_core::intent::Rover;
use sky_core::tool::ToolRequest;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Interactive chat: one question per line, `exit` to quit.
    Chat,
    /// Answer a single question.
    Ask(AskArgs),
    /// Call one NASA endpoint directly and print the typed result.
    Fetch(FetchArgs),
    /// Run the fixed query suite and summarize how often NASA data was used.
    Report(ReportArgs),
    /// Print the `nasa_api` function-tool definition.
    ToolSchema,
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// The question; multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskArgs {
    #[must_use]
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Clone, Debug, Args)]
pub struct FetchArgs {
    /// Endpoint: apod, mars_photos, neo or earth (aliases accepted).
    pub endpoint: String,

    /// Date in YYYY-MM-DD format.
    #[arg(long)]
    pub date: Option<String>,

    /// Mars rover.
    #[arg(long, value_parser = parse_rover)]
    pub rover: Option<Rover>,

    /// Martian sol (Mars photos).
    #[arg(long)]
    pub sol: Option<u32>,

    /// Camera abbreviation (Mars photos), e.g. FHAZ or NAVCAM.
    #[arg(long)]
    pub camera: Option<String>,

    /// Number of closest approaches to keep (NEO).
    #[arg(long)]
    pub count: Option<usize>,

    /// Latitude (Earth imagery, Landsat).
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude (Earth imagery, Landsat).
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl FetchArgs {
    /// The arguments as a `nasa_api` tool request.
    #[must_use]
    pub fn to_request(&self) -> ToolRequest {
        ToolRequest {
            endpoint: self.endpoint.clone(),
            date: self.date.clone(),
            rover: self.rover,
            sol: self.sol,
            camera: self.camera.clone(),
            count: self.count,
            lat: self.lat,
            lon: self.lon,
        }
    }
}

fn parse_rover(value: &str) -> Result<Rover, String> {
    value.parse().map_err(|e: sky_core::errors::CoreError| e.to_string())
}

#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    /// Also write `report.json` and `report.md` into this directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Also answer each query with the model alone and record its length.
    #[arg(long)]
    pub baseline: bool,
}
