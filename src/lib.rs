pub mod config;
pub mod diagnostic;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod outline;
pub mod parser;
pub mod routing;
pub mod schema;
pub mod svg;
pub mod syntax;
pub mod validate;

pub use config::DiagramConfig;
pub use diagnostic::{Diagnostic, Severity, ValidationReport};
pub use diagram::{Diagram, Snapshot};
pub use error::{Error, Result};
pub use layout::{LayoutEngine, LayoutResult};
pub use parser::extract;
pub use routing::{EdgeRouter, RoutedEdge, RoutingStyle};
pub use schema::{Relationship, Schema, Table};
pub use svg::SvgRenderer;
pub use validate::validate;

use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::Encode)
}

fn js_error(err: Error) -> js_sys::Error {
    js_sys::Error::new(&err.to_string())
}

/// Validate schema text; returns the report as JSON.
#[wasm_bindgen(js_name = "validateSchema")]
pub fn validate_schema(text: &str) -> Result<String, js_sys::Error> {
    to_json(&validate(text)).map_err(js_error)
}

/// Extract tables and relationships; returns the schema as JSON.
#[wasm_bindgen(js_name = "extractSchema")]
pub fn extract_schema(text: &str) -> Result<String, js_sys::Error> {
    to_json(&extract(text)).map_err(js_error)
}

/// Render schema text straight to an SVG preview.
#[wasm_bindgen(js_name = "schemaToSvg")]
pub fn schema_to_svg(
    text: &str,
    style: Option<String>,
    config: Option<String>,
) -> Result<String, js_sys::Error> {
    let config = match config.as_deref() {
        Some(json) => DiagramConfig::from_json(json).map_err(js_error)?,
        None => DiagramConfig::default(),
    };
    let renderer = SvgRenderer::new(config.metrics.clone());
    let mut diagram = Diagram::new(config);
    diagram.update(text);
    if let Some(style) = style.as_deref() {
        let style: RoutingStyle = style.parse().map_err(js_error)?;
        diagram.set_routing_style(style);
    }
    renderer.render_snapshot(diagram.snapshot()).map_err(js_error)
}

/// Stateful editing session for hosts that keep a live canvas.
///
/// Every mutating method returns the new snapshot as JSON.
#[wasm_bindgen]
pub struct DiagramSession {
    diagram: Diagram,
    renderer: SvgRenderer,
}

#[wasm_bindgen]
impl DiagramSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<DiagramSession, js_sys::Error> {
        let config = match config.as_deref() {
            Some(json) => DiagramConfig::from_json(json).map_err(js_error)?,
            None => DiagramConfig::default(),
        };
        Ok(Self {
            renderer: SvgRenderer::new(config.metrics.clone()),
            diagram: Diagram::new(config),
        })
    }

    pub fn update(&mut self, text: &str) -> Result<String, js_sys::Error> {
        to_json(self.diagram.update(text)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "moveTable")]
    pub fn move_table(&mut self, name: &str, x: f64, y: f64) -> Result<String, js_sys::Error> {
        let snapshot = self.diagram.move_table(name, x, y).map_err(js_error)?;
        to_json(snapshot).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "setRoutingStyle")]
    pub fn set_routing_style(&mut self, style: &str) -> Result<String, js_sys::Error> {
        let style: RoutingStyle = style.parse().map_err(js_error)?;
        to_json(self.diagram.set_routing_style(style)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "setScale")]
    pub fn set_scale(&mut self, scale: f64) -> Result<String, js_sys::Error> {
        let snapshot = self.diagram.set_scale(scale).map_err(js_error)?;
        to_json(snapshot).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "autoLayout")]
    pub fn auto_layout(&mut self) -> Result<String, js_sys::Error> {
        to_json(self.diagram.auto_layout()).map_err(js_error)
    }

    pub fn snapshot(&self) -> Result<String, js_sys::Error> {
        to_json(self.diagram.snapshot()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "toSvg")]
    pub fn to_svg(&self) -> Result<String, js_sys::Error> {
        self.renderer
            .render_snapshot(self.diagram.snapshot())
            .map_err(js_error)
    }
}
