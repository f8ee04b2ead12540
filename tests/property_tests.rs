//! Property-based tests for the tape, head, and transition table.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use tapevm::{
    ControlState, Head, InfiniteTape, Machine, MatchSpec, Movement, Rule, Symbol, TransitionTable,
    WriteSpec,
};

prop_compose! {
    fn arbitrary_symbol()(blank in prop::bool::weighted(0.2), c in prop::char::range('a', 'z')) -> Symbol<char> {
        if blank {
            Symbol::Blank
        } else {
            Symbol::Value(c)
        }
    }
}

prop_compose! {
    fn arbitrary_movement()(variant in 0..3u8) -> Movement {
        match variant {
            0 => Movement::Left,
            1 => Movement::Right,
            _ => Movement::Stay,
        }
    }
}

prop_compose! {
    fn arbitrary_match_spec()(any in prop::bool::weighted(0.2), symbol in arbitrary_symbol()) -> MatchSpec<char> {
        if any {
            MatchSpec::Any
        } else {
            MatchSpec::Symbol(symbol)
        }
    }
}

proptest! {
    #[test]
    fn tape_read_after_write(pos in -1000i64..1000, symbol in arbitrary_symbol()) {
        let mut tape = InfiniteTape::new();
        tape.set(pos, &[symbol]);

        prop_assert_eq!(tape.get(pos), symbol);
    }

    #[test]
    fn tape_matches_reference_model(
        writes in prop::collection::vec(
            (-50i64..50, prop::collection::vec(arbitrary_symbol(), 1..8)),
            1..10,
        )
    ) {
        let mut tape = InfiniteTape::new();
        let mut model: HashMap<i64, Symbol<char>> = HashMap::new();

        for (start, symbols) in &writes {
            tape.set(*start, symbols);
            for (i, symbol) in symbols.iter().enumerate() {
                model.insert(start + i as i64, *symbol);
            }
        }

        for pos in -80i64..=80 {
            let expected = model.get(&pos).copied().unwrap_or(Symbol::Blank);
            prop_assert_eq!(tape.get(pos), expected);
        }
    }

    #[test]
    fn head_position_is_net_movement(
        movements in prop::collection::vec(arbitrary_movement(), 0..100)
    ) {
        let mut head = Head::new(InfiniteTape::<char>::new(), 0);
        let mut net = 0i64;

        for movement in &movements {
            head.advance(*movement);
            match movement {
                Movement::Left => net -= 1,
                Movement::Right => net += 1,
                Movement::Stay => {}
            }
            prop_assert!(head.min_pos() <= head.pos());
            prop_assert!(head.pos() <= head.max_pos());
        }

        prop_assert_eq!(head.pos(), net);
        prop_assert!(head.min_pos() <= 0);
        prop_assert!(head.max_pos() >= 0);
    }

    #[test]
    fn head_extent_only_widens(
        movements in prop::collection::vec(arbitrary_movement(), 0..100)
    ) {
        let mut head = Head::new(InfiniteTape::<char>::new(), 0);
        let mut min_seen = head.min_pos();
        let mut max_seen = head.max_pos();

        for movement in &movements {
            head.advance(*movement);
            prop_assert!(head.min_pos() <= min_seen);
            prop_assert!(head.max_pos() >= max_seen);
            min_seen = head.min_pos();
            max_seen = head.max_pos();
        }
    }

    #[test]
    fn table_len_counts_distinct_keys(
        inserts in prop::collection::vec((0..5u8, arbitrary_match_spec()), 0..30)
    ) {
        let mut table = TransitionTable::new();
        let mut keys = HashSet::new();

        for (state, read) in &inserts {
            let from = ControlState::new(format!("s{state}"));
            keys.insert((from.name.clone(), read.clone()));
            table.insert(Rule {
                from,
                read: read.clone(),
                write: WriteSpec::Keep,
                movement: Movement::Right,
                to: ControlState::halting("end"),
            });
        }

        prop_assert_eq!(table.len(), keys.len());
        prop_assert_eq!(table.is_empty(), keys.is_empty());
    }

    #[test]
    fn zeroing_machine_zeroes_any_input(input in prop::collection::vec(prop::char::range('a', 'z'), 0..30)) {
        let zero = ControlState::new("zero");
        let halt = ControlState::halting("halt");
        let table: TransitionTable<char> = [
            Rule {
                from: zero.clone(),
                read: MatchSpec::Any,
                write: WriteSpec::Symbol(Symbol::Value('0')),
                movement: Movement::Right,
                to: zero.clone(),
            },
            Rule {
                from: zero.clone(),
                read: MatchSpec::Symbol(Symbol::Blank),
                write: WriteSpec::Keep,
                movement: Movement::Stay,
                to: halt,
            },
        ]
        .into_iter()
        .collect();

        let mut tape = InfiniteTape::new();
        let symbols: Vec<Symbol<char>> = input.iter().map(|c| Symbol::Value(*c)).collect();
        tape.set(0, &symbols);

        let mut head = Head::new(tape, 0);
        let mut machine = Machine::new(&mut head, &table, zero);
        machine.run().unwrap();

        prop_assert!(machine.is_halted());
        prop_assert_eq!(machine.steps(), input.len() + 1);
        prop_assert_eq!(head.pos(), input.len() as i64);
        for i in 0..input.len() as i64 {
            prop_assert_eq!(head.tape().get(i), Symbol::Value('0'));
        }
        prop_assert_eq!(head.tape().get(input.len() as i64), Symbol::Blank);
    }
}
