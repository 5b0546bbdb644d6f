// Copyright 2025 The toolfocus Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # toolfocus
//!
//! Focus estimation for tool-changer inspection cameras.
//!
//! A snapshot from the camera is cropped to the viewer size, the sharpness of
//! a ring around the nozzle is measured as the variance of the Laplacian, and
//! the frame is returned with the ring guides and the score drawn on it.
//! Raising the tool until the score peaks puts it in focus at the camera's
//! working distance.
//!
//! ## Example
//!
//! ```rust,no_run
//! use toolfocus::{DiagnosticRequest, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = Settings::load().with_env_overrides().pipeline()?;
//!
//!     let request = DiagnosticRequest::new(588, 441).with_radii(40, 100);
//!     let frame = pipeline.produce_diagnostic_image(&request).await?;
//!
//!     println!("focus: {:.0}", frame.score());
//!     std::fs::write("focus.png", &frame.png)?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod overlay;
pub mod pipeline;
pub mod settings;
pub mod source;

pub use api::{handle_query, parse_image_query, ApiResponse};
pub use error::FocusError;
pub use focus::{estimate_focus, AnnulusMask, EdgeField, FocusEstimate};
pub use geometry::{crop_centered, Region};
pub use overlay::{LabelFont, Overlay, OverlayStyle};
pub use pipeline::{
    render_diagnostic, AnnotatedFrame, DiagnosticRequest, FocusReport, FramePipeline,
};
pub use settings::{Settings, SettingsError};
pub use source::{FileSource, HttpSnapshotSource, ImageSource, MemorySource};
