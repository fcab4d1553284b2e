// Simple command-line application to play chess

use arbiter::{Board, Color, File, MoveError, Progress, PromoteKind, Rank, Style};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

fn print_board(board: &Board) {
    for rank in Rank::iter().rev() {
        let row: String = File::iter()
            .map(|file| board.grid().get2(file, rank).map_or('.', |p| p.as_char()))
            .collect();
        println!("{} {}", rank.as_char(), row);
    }
    println!("  abcdefgh");
}

fn read_line(stdin: &mut impl BufRead, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().unwrap();
    let mut s = String::new();
    if stdin.read_line(&mut s).unwrap() == 0 {
        return None;
    }
    Some(s.trim().to_string())
}

fn main() {
    let mut stdin = io::stdin().lock();

    let mut board = Board::initial();

    loop {
        if board.result().is_finished() {
            println!("Game finished: {}", board.result());
            println!("Notation:");
            println!("{}", board.history().notation(Style::Figurine));
            break;
        }

        print_board(&board);
        if board.is_check() {
            println!("Check!");
        }
        let side = match board.side() {
            Color::White => "White",
            Color::Black => "Black",
        };
        let prompt = format!("{} move ({}): ", side, board.history().full_move_number());
        let s = match read_line(&mut stdin, &prompt) {
            Some(s) => s,
            None => break,
        };

        match board.play_uci(&s) {
            Ok(Progress::Completed) => {}
            Ok(Progress::PromotionPending) => loop {
                // Moves like "e7e8" leave the promotion open, so ask for the piece.
                let s = match read_line(&mut stdin, "Promote to (queen/rook/bishop/knight): ") {
                    Some(s) => s,
                    None => return,
                };
                match PromoteKind::from_str(&s) {
                    Ok(kind) => {
                        // The pending move is known to be legal for every piece kind.
                        board.complete_promotion(kind).unwrap();
                        break;
                    }
                    Err(e) => println!("{}", e),
                }
            },
            Err(MoveError::NotLegal(mv)) => println!("Illegal move: {}", mv),
            Err(e) => println!("Bad move: {}", e),
        }

        println!();
    }
}
