//! Permissive GEXF ingestion.
//!
//! Line-oriented tag scrape of the GEXF graph-exchange format: recovers the
//! attribute definition whose `title` matches the requested value
//! attribute, node declarations with their nested `attvalue` entries, and
//! weighted edges. Unknown elements are ignored and malformed numeric
//! values are skipped silently; a missing attribute definition is only a
//! warning, leaving every node ineligible.

use crate::graph::{Graph, GraphBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Edge probability assumed when the source supplies no weight.
pub const DEFAULT_EDGE_PROBABILITY: f64 = 0.1;

/// Errors surfaced while reading a graph file.
#[derive(Debug, Error)]
pub enum GexfError {
    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a GEXF file into a [`Graph`], marking nodes that carry
/// `value_attribute` as eligible.
pub fn parse_file<P: AsRef<Path>>(path: P, value_attribute: &str) -> Result<Graph, GexfError> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), value_attribute)
}

/// Parse GEXF from any buffered reader. See the module docs for the
/// subset of the format that is recognized.
pub fn parse_reader<R: BufRead>(reader: R, value_attribute: &str) -> Result<Graph, GexfError> {
    let mut builder = GraphBuilder::new();
    let mut target_attr_id: Option<String> = None;
    let mut in_node = false;
    let mut current_node_id = String::new();

    for line in reader.lines() {
        let line = line?;
        if !line.contains('<') {
            continue;
        }

        if line.contains("<attribute ") {
            if let Some(title) = xml_attr(&line, "title") {
                if title == value_attribute {
                    if let Some(id) = xml_attr(&line, "id") {
                        info!(attribute = value_attribute, id = %id, "found attribute definition");
                        target_attr_id = Some(id);
                    }
                }
            }
        }

        if line.contains("<node") {
            if let Some(id) = xml_attr(&line, "id") {
                builder.intern(&id);
                current_node_id = id;
                in_node = !line.contains("/>");
            }
        }

        if in_node && line.contains("<attvalue") {
            if let Some(target_id) = &target_attr_id {
                if xml_attr(&line, "for").as_deref() == Some(target_id.as_str()) {
                    if let Some(val) = xml_attr(&line, "value") {
                        if let Ok(value) = val.parse::<f64>() {
                            builder.set_value(&current_node_id, value);
                        }
                    }
                }
            }
        }

        if line.contains("</node>") {
            in_node = false;
        }

        if line.contains("<edge") {
            let source = xml_attr(&line, "source");
            let target = xml_attr(&line, "target");
            let probability = xml_attr(&line, "weight")
                .and_then(|w| w.parse::<f64>().ok())
                .unwrap_or(DEFAULT_EDGE_PROBABILITY);

            if let (Some(s), Some(t)) = (source, target) {
                if !s.is_empty() && !t.is_empty() {
                    builder.add_edge(&s, &t, probability);
                }
            }
        }
    }

    if target_attr_id.is_none() {
        warn!(
            attribute = value_attribute,
            "attribute not found in GEXF definitions; no nodes are eligible"
        );
    }

    Ok(builder.finalize())
}

/// Extract `name="..."` from a tag line. Best effort: first occurrence,
/// double quotes only.
fn xml_attr(line: &str, name: &str) -> Option<String> {
    let needle = format!("{}=\"", name);
    let start = line.find(&needle)? + needle.len();
    let rest = &line[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://www.gexf.net/1.2draft" version="1.2">
  <graph defaultedgetype="directed">
    <attributes class="node">
      <attribute id="0" title="influence" type="double"/>
      <attribute id="1" title="other" type="double"/>
    </attributes>
    <nodes>
      <node id="a" label="Alice">
        <attvalues>
          <attvalue for="0" value="7.5"/>
          <attvalue for="1" value="99.0"/>
        </attvalues>
      </node>
      <node id="b" label="Bob"/>
      <node id="c" label="Carol">
        <attvalues>
          <attvalue for="0" value="oops"/>
        </attvalues>
      </node>
    </nodes>
    <edges>
      <edge id="e0" source="a" target="b" weight="0.8"/>
      <edge id="e1" source="b" target="c"/>
      <edge id="e2" source="a" target="d" weight="nonsense"/>
    </edges>
  </graph>
</gexf>
"#;

    fn parse(input: &str, attribute: &str) -> Graph {
        parse_reader(input.as_bytes(), attribute).unwrap()
    }

    #[test]
    fn recovers_values_for_the_requested_attribute() {
        let g = parse(SAMPLE, "influence");
        assert_eq!(g.node_count(), 4);
        let a = g.eligible_nodes();
        assert_eq!(a.len(), 1);
        assert_eq!(g.external_id(a[0]), "a");
        assert_eq!(g.value(a[0]), 7.5);
    }

    #[test]
    fn attribute_id_is_matched_by_title() {
        let g = parse(SAMPLE, "other");
        let eligible = g.eligible_nodes();
        assert_eq!(eligible.len(), 1);
        assert_eq!(g.value(eligible[0]), 99.0);
    }

    #[test]
    fn missing_weight_defaults_and_malformed_weight_defaults() {
        let g = parse(SAMPLE, "influence");
        // a -> b carries its explicit weight.
        let a = 0;
        let out: Vec<f64> = g.out_edges(a).iter().map(|e| e.probability).collect();
        assert_eq!(out, vec![0.8, DEFAULT_EDGE_PROBABILITY]);
        // b -> c falls back to the default.
        assert_eq!(g.out_edges(1)[0].probability, DEFAULT_EDGE_PROBABILITY);
    }

    #[test]
    fn malformed_attvalue_is_skipped() {
        let g = parse(SAMPLE, "influence");
        let c = g
            .eligible_nodes()
            .iter()
            .any(|&u| g.external_id(u) == "c");
        assert!(!c);
    }

    #[test]
    fn edge_only_endpoints_are_interned() {
        let g = parse(SAMPLE, "influence");
        assert!((0..g.node_count() as u32).any(|u| g.external_id(u) == "d"));
    }

    #[test]
    fn missing_attribute_definition_leaves_everyone_ineligible() {
        let g = parse(SAMPLE, "no_such_attribute");
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.eligible_count(), 0);
    }

    #[test]
    fn self_closing_node_does_not_capture_later_attvalues() {
        let input = r#"
<attribute id="0" title="influence"/>
<node id="x"/>
<attvalue for="0" value="5.0"/>
"#;
        let g = parse(input, "influence");
        assert_eq!(g.eligible_count(), 0);
    }

    #[test]
    fn out_of_range_weights_are_clamped() {
        let input = r#"
<node id="u"/>
<node id="v"/>
<edge source="u" target="v" weight="3.5"/>
"#;
        let g = parse(input, "influence");
        assert_eq!(g.out_edges(0)[0].probability, 1.0);
    }

    #[test]
    fn io_error_is_propagated() {
        let err = parse_file("/definitely/not/here.gexf", "influence");
        assert!(matches!(err, Err(GexfError::Io(_))));
    }
}
