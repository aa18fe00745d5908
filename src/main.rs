use colored::Colorize;
use std::io;

use samuraifrog_rs::games::samuraifrog::{Card, GameSession, State};

pub fn get_input(prompt: &str) -> String {
    println!("{}", prompt);
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_goes_into_input_above) => {}
        Err(_no_updates_is_fine) => {}
    }
    input.trim().to_string()
}

fn print_card(card: Card) -> String {
    let penalty = card.penalty.to_string();
    let colored_penalty = match card.penalty {
        1 => penalty.green(),
        2 => penalty.cyan(),
        3 => penalty.blue(),
        4 => penalty.yellow(),
        5 => penalty.magenta(),
        6 => penalty.red(),
        _ => penalty.white(),
    };
    format!("{:>3}({})", card.value, colored_penalty)
}

fn display_table(session: &GameSession) {
    println!("---");
    for (index, row) in session.rows().iter().enumerate() {
        println!(
            "row {}: {}",
            index,
            row.cards()
                .iter()
                .map(|c| print_card(*c))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
    for player in session.players() {
        println!(
            "{}: {} pts{}",
            player.name,
            player.penalty_points,
            if player.alive { "" } else { " (OUT)" }
        );
    }
    println!("---");
}

fn display_hand(session: &GameSession) {
    println!(
        "your hand: {}",
        session
            .human()
            .hand
            .iter()
            .map(|c| print_card(*c))
            .collect::<Vec<_>>()
            .join(" ")
    );
}

fn prompt_bot_count(session: &mut GameSession) {
    while session.state() == State::Menu {
        if let Ok(bots) = get_input("How many bots? (1-9)").parse::<usize>() {
            session.select_bot_count(bots);
        }
    }
}

fn prompt_card(session: &mut GameSession) {
    display_table(session);
    display_hand(session);
    while !session.has_committed(0) {
        if let Ok(value) = get_input("Play which card? (enter its value)").parse::<i32>() {
            session.submit_human_card_choice(value);
        }
    }
}

fn prompt_row(session: &mut GameSession) {
    let (_, card) = session.pending_row_choice().expect("a row choice is pending");
    display_table(session);
    println!(
        "no row can take {} - you must take a row's cards",
        print_card(card)
    );
    while session.state() == State::PickRow {
        if let Ok(row_index) = get_input("Take which row?").parse::<usize>() {
            session.submit_human_row_choice(row_index);
        }
    }
}

fn display_standings(session: &GameSession) {
    println!("\n=== Leaderboard ===");
    for (place, (name, points)) in session.leaderboard().iter().enumerate() {
        println!("{}. {}: {} pts", place + 1, name, points);
    }
    if let Some(winner) = session.players().iter().find(|p| p.alive) {
        println!("winner: {} with {} pts", winner.name.green(), winner.penalty_points);
    }
}

fn play_one_game() {
    let mut session = GameSession::new();
    prompt_bot_count(&mut session);
    while session.state() != State::Leaderboard {
        session.advance();
        match session.state() {
            State::Round => {
                if session.human().alive && !session.has_committed(0) {
                    prompt_card(&mut session);
                }
            }
            State::PickRow => prompt_row(&mut session),
            _ => {}
        }
    }
    display_standings(&session);
}

fn main() {
    env_logger::init();
    loop {
        play_one_game();
        if get_input("Play again? (y/n)").to_lowercase() != "y" {
            break;
        }
    }
}
