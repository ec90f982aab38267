//! Rules command - List the transition rule table

use std::path::Path;

use crate::domain::{get_area_index, RuleTable};
use crate::errors::Result;
use crate::schemas::TransitionRule;

use super::print_json;

pub async fn run(_cwd: Option<&Path>, json: bool) -> Result<()> {
    let table = RuleTable::standard();
    let rules = sorted(&table);

    if json {
        return print_json(&rules);
    }
    for rule in rules {
        let fields: Vec<&str> = rule.fields.iter().map(|f| f.id.as_str()).collect();
        println!("{:<36} {:<34} [{}]", rule.key(), rule.title, fields.join(", "));
    }
    Ok(())
}

fn sorted(table: &RuleTable) -> Vec<&TransitionRule> {
    let mut rules: Vec<&TransitionRule> = table.iter().collect();
    rules.sort_by_key(|r| (get_area_index(r.from), get_area_index(r.to)));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Area;

    #[test]
    fn test_sorted_by_area_order() {
        let table = RuleTable::standard();
        let rules = sorted(&table);
        assert_eq!(rules.len(), table.len());
        assert_eq!(rules[0].from, Area::Intake);
    }
}
