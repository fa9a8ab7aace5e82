//! The `shortmatch init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("shortmatch.toml").exists() {
        println!("shortmatch.toml already exists, skipping.");
    } else {
        std::fs::write("shortmatch.toml", SAMPLE_CONFIG)?;
        println!("Created shortmatch.toml");
    }

    std::fs::create_dir_all("definitions")?;
    let example_path = std::path::Path::new("definitions/example.json");
    if example_path.exists() {
        println!("definitions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DEFINITION)?;
        println!("Created definitions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: shortmatch validate --definition definitions/example.json");
    println!("  2. Run: shortmatch grade --definition definitions/example.json --answer Paris");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# shortmatch configuration

parallelism = 4
pattern_size_limit = 1048576
output_dir = "./shortmatch-results"
"#;

// `valid` marks a rule correct by being present; its value is ignored.
const EXAMPLE_DEFINITION: &str = r#"{
  "header": "What is the capital of France?",
  "no_match_feedback": "Think of the city with the Eiffel Tower.",
  "matches": {
    "1": {
      "regex": "(?i)\\s*paris\\s*$",
      "valid": "on",
      "feedback": "Correct!"
    },
    "2": {
      "regex": "(?i)\\s*(lyon|marseille)",
      "feedback": "That is a French city, but not the capital."
    }
  }
}
"#;
