use aoc_framework::{
    AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, RegistryBuilder, SolveError,
};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 24, tags = ["macro-test", "lines"])]
pub struct LineCounter;

impl AocParser for LineCounter {
    type SharedData<'a> = Vec<&'a str>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(input.lines().collect())
    }
}

impl PartSolver<1> for LineCounter {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

impl PartSolver<2> for LineCounter {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|l| l.len()).sum::<usize>().to_string())
    }
}

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(day = 25)]
pub struct Untagged;

impl AocParser for Untagged {
    type SharedData<'a> = ();

    fn parse(_input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(())
    }
}

impl PartSolver<1> for Untagged {
    fn solve(_shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok("merry".to_string())
    }
}

#[test]
fn test_plugins_are_collected() {
    let registry = RegistryBuilder::new().register_all_plugins().unwrap().build();
    assert!(registry.contains(24));
    assert!(registry.contains(25));

    let info = registry.get_info(24).unwrap();
    assert_eq!(info.parts, 2);
    assert_eq!(info.tags, &["macro-test", "lines"]);
    assert!(registry.get_info(25).unwrap().tags.is_empty());
}

#[test]
fn test_filtered_registration() {
    let registry = RegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"macro-test"))
        .unwrap()
        .build();
    assert_eq!(registry.len(), 1);

    let mut solver = registry.create_solver(24, "ab\ncde\n").unwrap();
    assert_eq!(solver.solve(1).unwrap().answer, "2");
    assert_eq!(solver.solve(2).unwrap().answer, "5");
}
