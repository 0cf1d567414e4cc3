//! Host-supplied configuration.
//!
//! Every section and field is optional in the JSON document; anything left
//! out keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::LayoutConfig;
use crate::measure::TableMetrics;
use crate::routing::RoutingConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramConfig {
    pub metrics: TableMetrics,
    pub layout: LayoutConfig,
    pub routing: RoutingConfig,
}

impl DiagramConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if !(config.routing.scale.is_finite() && config.routing.scale > 0.0) {
            return Err(Error::InvalidScale(config.routing.scale));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingStyle;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(DiagramConfig::from_json("{}").unwrap(), DiagramConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = DiagramConfig::from_json(
            r#"{"routing": {"style": "orthogonal"}, "metrics": {"rowHeight": 30}}"#,
        )
        .unwrap();
        assert_eq!(config.routing.style, RoutingStyle::Orthogonal);
        assert_eq!(config.metrics.row_height, 30.0);
        assert_eq!(config.metrics.header_height, TableMetrics::default().header_height);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            DiagramConfig::from_json(r#"{"routing": {"style": "zigzag"}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DiagramConfig::from_json(r#"{"routing": {"scale": 0}}"#),
            Err(Error::InvalidScale(_))
        ));
        assert!(DiagramConfig::from_json("not json").is_err());
    }
}
