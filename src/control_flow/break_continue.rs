//! Example: `break`, `continue` and labelled loops

pub fn basic_break() -> Vec<i32> {
    let mut seen = Vec::new();
    for i in 0..5 {
        if i == 3 {
            break;
        }
        seen.push(i);
    }
    seen
}

pub fn basic_continue() -> Vec<i32> {
    let mut seen = Vec::new();
    for i in 0..5 {
        if i == 2 {
            continue;
        }
        seen.push(i);
    }
    seen
}

/// Only the inner loop stops at (1, 1).
pub fn inner_break() -> Vec<(i32, i32)> {
    let mut seen = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            if i == 1 && j == 1 {
                break;
            }
            seen.push((i, j));
        }
    }
    seen
}

/// Both loops stop at (1, 1).
pub fn labeled_break() -> Vec<(i32, i32)> {
    let mut seen = Vec::new();
    'outer: for i in 0..3 {
        for j in 0..3 {
            if i == 1 && j == 1 {
                break 'outer;
            }
            seen.push((i, j));
        }
    }
    seen
}

pub fn inner_continue() -> Vec<(i32, i32)> {
    let mut seen = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            if i == 1 && j == 1 {
                continue;
            }
            seen.push((i, j));
        }
    }
    seen
}

pub fn labeled_continue() -> Vec<(i32, i32)> {
    let mut seen = Vec::new();
    'outer: for i in 0..3 {
        for j in 0..3 {
            if i == 1 && j == 1 {
                continue 'outer;
            }
            seen.push((i, j));
        }
    }
    seen
}

/// A `match` arm ends on its own; nothing after the chosen arm runs.
pub fn match_early_exit(flag: bool) -> &'static str {
    match flag {
        true => "First case",
        false => "Second case",
    }
}

pub fn range_continue() -> Vec<i32> {
    [1, 2, 3, 4, 5].into_iter().filter(|&n| n != 3).collect()
}

/// `break` can carry a value out of `loop`.
pub fn first_square_above(limit: u32) -> u32 {
    let mut n = 0;
    loop {
        n += 1;
        if n * n > limit {
            break n * n;
        }
    }
}
