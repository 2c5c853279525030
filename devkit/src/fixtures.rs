/*!
Fixtures de sortie `rac`

Construit des sorties texte au format de `rac` : blocs de lignes
`clé : valeur`, chaque bloc suivi d'une ligne vide.
*/

use std::fmt::Display;

/// Builder de sortie `rac` multi-blocs
#[derive(Debug, Clone, Default)]
pub struct RacOutputBuilder {
    blocks: Vec<Vec<String>>,
}

impl RacOutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bloc de `cluster list`
    pub fn cluster<S: Into<String>>(mut self, id: S, name: &str) -> Self {
        self.blocks.push(vec![
            field("cluster", id.into()),
            field("host", "srv1c"),
            field("port", 1541),
            field("name", format!("\"{name}\"")),
            field("expiration-timeout", 60),
        ]);
        self
    }

    /// Bloc de `process list` ; `performance` peut être invalide (ex. "n/a")
    pub fn process<P: Display>(mut self, host: &str, performance: P) -> Self {
        let index = self.blocks.len();
        self.blocks.push(vec![
            field("process", format!("00000000-0000-0000-0000-{index:012}")),
            field("host", host),
            field("port", 1560 + index),
            field("pid", 4000 + index),
            field("is-enable", "yes"),
            "started-at           : 2024-03-11T08:15:42".to_string(),
            field("available-perfomance", performance),
        ]);
        self
    }

    /// Bloc brut, lignes telles quelles
    pub fn block(mut self, lines: &[&str]) -> Self {
        self.blocks.push(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn build(&self) -> String {
        let mut output = String::new();
        for block in &self.blocks {
            for line in block {
                output.push_str(line);
                output.push('\n');
            }
            output.push('\n');
        }
        output
    }
}

fn field<V: Display>(key: &str, value: V) -> String {
    format!("{key:<20} : {value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rac_explorer::parser::parse_multi_record;

    #[test]
    fn test_process_blocks_parse_back() {
        let output = RacOutputBuilder::new()
            .process("srv-app-01", 80)
            .process("srv-app-02", "n/a")
            .build();

        let records = parse_multi_record(&output);
        // Trailing blank line yields an empty record
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["host"], "srv-app-01");
        assert_eq!(records[0]["available-perfomance"], "80");
        assert!(!records[0].contains_key("started-at"));
        assert_eq!(records[1]["available-perfomance"], "n/a");
        assert!(records[2].is_empty());
    }

    #[test]
    fn test_cluster_block() {
        let output = RacOutputBuilder::new().cluster("c1", "main").build();
        assert!(output.starts_with("cluster              : c1\n"));
        assert!(output.ends_with("\n\n"));
    }
}
