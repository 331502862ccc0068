use crate::algorithms::{AlgorithmDescriptor, AlgorithmRegistry};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

fn options_cell(descriptor: &AlgorithmDescriptor) -> String {
    if descriptor.options().is_empty() {
        return "-".to_string();
    }
    descriptor
        .options()
        .iter()
        .map(|o| format!("{}.{}: {} = {}", descriptor.name(), o.key, o.kind.label(), o.default))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The registry as a table: name, category, summary, options with defaults.
pub fn render_table(registry: &AlgorithmRegistry) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Algorithm", "Category", "Description", "Options"]);
    for descriptor in registry.descriptors() {
        table.add_row(vec![
            descriptor.name().to_string(),
            descriptor.category().to_string(),
            descriptor.summary().to_string(),
            options_cell(descriptor),
        ]);
    }
    table
}

pub fn list_algorithms() {
    let registry = AlgorithmRegistry::builtin();
    println!("{}", render_table(&registry));
    for skipped in registry.skipped() {
        eprintln!("{} {}: {}", "skipped".yellow(), skipped.name, skipped.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_algorithm_with_options() {
        let rendered = render_table(&AlgorithmRegistry::builtin()).to_string();
        for name in ["dbscan", "minmaxscaler", "textnormalizer", "tfidf"] {
            assert!(rendered.contains(name), "missing {}", name);
        }
        assert!(rendered.contains("dbscan.eps: float = 0.5"));
        assert!(rendered.contains("feature_extraction"));
    }
}
