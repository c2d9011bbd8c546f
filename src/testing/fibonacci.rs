//! Benchmark subjects: two Fibonacci implementations and a couple of
//! helpers for the sizing and allocation benches.

/// Exponential-time recursion.
pub fn fibonacci(n: u32) -> u64 {
    if n < 2 {
        return u64::from(n);
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

/// Linear-time iteration.
pub fn fibonacci_optimized(n: u32) -> u64 {
    if n < 2 {
        return u64::from(n);
    }
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 2..=n {
        (a, b) = (b, a + b);
    }
    b
}

pub fn sum_slice(data: &[i64]) -> i64 {
    data.iter().sum()
}

/// `count` buffers of `size` bytes each.
pub fn allocate(count: usize, size: usize) -> Vec<Vec<u8>> {
    (0..count).map(|_| vec![0u8; size]).collect()
}
