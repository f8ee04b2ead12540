use crate::program::Program;
use crate::types::{ControlState, ProgramError};

use std::collections::HashSet;
use std::sync::RwLock;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../programs/zero-all.tur"),
    include_str!("../programs/mirror.tur"),
    include_str!("../programs/copy.tur"),
    include_str!("../programs/binary-increment.tur"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Initialize the ProgramManager with the embedded programs
    pub fn load() -> Result<(), ProgramError> {
        let mut programs = Vec::new();

        for program_text in PROGRAM_TEXTS {
            match crate::parser::parse(program_text) {
                Ok(program) => programs.push(program),
                Err(e) => eprintln!("Failed to parse embedded program: {e}"),
            }
        }

        // Store the loaded programs
        if let Ok(mut write_guard) = PROGRAMS.write() {
            *write_guard = programs;
        } else {
            return Err(ProgramError::File(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, ProgramError> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| ProgramError::File("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                ProgramError::Validation(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, ProgramError> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| ProgramError::File("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| ProgramError::Validation(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, ProgramError> {
        let program = Self::get_program_by_index(index)?;
        let states: HashSet<&str> = program
            .rules
            .iter()
            .map(|rule| rule.from.name.as_str())
            .collect();

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.initial_state.clone(),
            initial_tape: program
                .tape
                .iter()
                .map(|symbol| symbol.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            state_count: states.len(),
            rule_count: program.rules.len(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .enumerate()
                    .filter(|(_, program)| {
                        program.name.to_lowercase().contains(&query.to_lowercase())
                    })
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }
}

/// A compact summary of an embedded program.
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: ControlState,
    pub initial_tape: String,
    pub state_count: usize,
    pub rule_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;
    use crate::types::Symbol;

    #[test]
    fn test_program_manager_initialization() {
        let result = ProgramManager::load();
        assert!(result.is_ok());

        assert_eq!(ProgramManager::get_program_count(), 4);
    }

    #[test]
    fn test_all_programs_are_valid() {
        let _ = ProgramManager::load();

        let count = ProgramManager::get_program_count();
        for i in 0..count {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            assert!(
                analyzer::analyze(&program).is_ok(),
                "Program '{}' is invalid",
                program.name
            );
        }
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert!(names.contains(&"Zero all".to_string()));
        assert!(names.contains(&"Mirror".to_string()));
        assert!(names.contains(&"Copy".to_string()));
        assert!(names.contains(&"Binary increment".to_string()));
    }

    #[test]
    fn test_get_program_by_index() {
        let program = ProgramManager::get_program_by_index(0);
        assert!(program.is_ok());

        let result = ProgramManager::get_program_by_index(999);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("Mirror").unwrap();
        assert_eq!(
            program.tape,
            vec![Symbol::Value('1'), Symbol::Value('0'), Symbol::Value('1')]
        );

        let result = ProgramManager::get_program_by_name("Nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();
        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Zero all");
        assert_eq!(info.initial_state, ControlState::new("sweep"));
        assert_eq!(info.initial_tape, "1 1 1 0 1 1 0 1 0 1");
        assert_eq!(info.state_count, 1);
        assert_eq!(info.rule_count, 2);

        let result = ProgramManager::get_program_info(999);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_programs() {
        let results = ProgramManager::search_programs("copy");
        assert_eq!(results.len(), 1);

        let results = ProgramManager::search_programs("BINARY");
        assert_eq!(results.len(), 1);

        let results = ProgramManager::search_programs("nonexistent");
        assert_eq!(results.len(), 0);
    }

    #[test]
    fn test_zero_all_runs_to_halt() {
        let program = ProgramManager::get_program_by_name("Zero all").unwrap();
        let outcome = program.run().unwrap();

        assert_eq!(outcome.state, ControlState::halting("done"));
        assert_eq!(outcome.steps, 11);
        assert_eq!(outcome.pos, 10);
        assert_eq!(outcome.min_pos, 0);
        assert_eq!(outcome.max_pos, 10);
        assert_eq!(outcome.tape, "0 0 0 0 0 0 0 0 0 0 _");
    }

    #[test]
    fn test_mirror_runs_to_halt() {
        let program = ProgramManager::get_program_by_name("Mirror").unwrap();
        let outcome = program.run().unwrap();

        assert_eq!(outcome.state, ControlState::halting("halt"));
        assert_eq!(outcome.pos, 0);
        assert_eq!(outcome.min_pos, -1);
        assert_eq!(outcome.max_pos, 5);
        assert_eq!(outcome.tape, "_ 1 0 1 1 0 1");
    }

    #[test]
    fn test_copy_runs_to_halt() {
        let program = ProgramManager::get_program_by_name("Copy").unwrap();
        let outcome = program.run().unwrap();

        // The head parks on the separator between original and copy
        assert_eq!(outcome.state, ControlState::halting("done"));
        assert_eq!(outcome.pos, 10);
        assert_eq!(outcome.min_pos, 0);
        assert_eq!(outcome.max_pos, 20);
        assert_eq!(outcome.tape, "1 1 1 0 1 1 0 1 0 1 _ 1 1 1 0 1 1 0 1 0 1");
    }

    #[test]
    fn test_binary_increment_runs_to_halt() {
        let program = ProgramManager::get_program_by_name("Binary increment").unwrap();
        let outcome = program.run().unwrap();

        assert_eq!(outcome.state, ControlState::halting("done"));
        assert_eq!(outcome.steps, 8);
        assert_eq!(outcome.pos, 1);
        assert_eq!(outcome.min_pos, 0);
        assert_eq!(outcome.max_pos, 4);
        assert_eq!(outcome.tape, "1 1 0 0 _");
    }

    #[test]
    fn test_binary_increment_grows_left_on_overflow() {
        let mut program = ProgramManager::get_program_by_name("Binary increment").unwrap();

        // All ones: the carry ripples past the leftmost bit
        program.tape = vec![Symbol::Value('1'), Symbol::Value('1')];
        let outcome = program.run().unwrap();

        assert_eq!(outcome.steps, 6);
        assert_eq!(outcome.pos, -1);
        assert_eq!(outcome.min_pos, -1);
        assert_eq!(outcome.max_pos, 2);
        assert_eq!(outcome.tape, "1 0 0 _");
    }
}
