//! Example: Fixed arrays, growable vectors and borrowed slices

pub fn empty_array() -> [i32; 5] {
    [0; 5]
}

pub fn inferred_array() -> [&'static str; 3] {
    ["apple", "banana", "orange"]
}

/// Elements 1..4 of `[1, 2, 3, 4, 5]`.
pub fn slice_of_array() -> Vec<i32> {
    let numbers = [1, 2, 3, 4, 5];
    numbers[1..4].to_vec()
}

/// Push three values, then append a whole slice.
pub fn append_values() -> Vec<i32> {
    let mut values = Vec::new();
    values.extend([1, 2, 3]);
    values.extend_from_slice(&[1, 2, 3, 4, 5]);
    values
}

/// Length 3, capacity at least 6.
pub fn with_capacity() -> Vec<i32> {
    let mut values = Vec::with_capacity(6);
    values.resize(3, 0);
    values
}

pub fn copy_slice(source: &[i32]) -> Vec<i32> {
    let mut copy = vec![0; source.len()];
    copy.copy_from_slice(source);
    copy
}

pub fn sub_slice(values: &[i32], start: usize, end: usize) -> Option<&[i32]> {
    values.get(start..end)
}

pub fn matrix() -> Vec<Vec<i32>> {
    vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]
}

pub fn transpose(matrix: &[Vec<i32>]) -> Vec<Vec<i32>> {
    let columns = matrix.first().map_or(0, Vec::len);
    (0..columns)
        .map(|c| matrix.iter().map(|row| row[c]).collect())
        .collect()
}

#[cfg(test)]
mod arrays_slices_tests {
    use super::*;

    #[test]
    fn test_arrays() {
        assert_eq!(empty_array(), [0, 0, 0, 0, 0]);
        assert_eq!(inferred_array().len(), 3);
        assert_eq!(slice_of_array(), vec![2, 3, 4]);
    }

    #[test]
    fn test_vec_growth() {
        assert_eq!(append_values(), vec![1, 2, 3, 1, 2, 3, 4, 5]);
        let v = with_capacity();
        assert_eq!(v, vec![0, 0, 0]);
        assert!(v.capacity() >= 6);
    }

    #[test]
    fn test_copies_and_sub_slices() {
        let numbers = [1, 2, 3, 4, 5];
        assert_eq!(copy_slice(&numbers), numbers.to_vec());
        assert_eq!(sub_slice(&numbers, 1, 3), Some(&[2, 3][..]));
        assert_eq!(sub_slice(&numbers, 3, 9), None);
    }

    #[test]
    fn test_matrix() {
        let m = matrix();
        assert_eq!(m[1], vec![4, 5, 6]);
        assert_eq!(transpose(&m)[0], vec![1, 4, 7]);
        assert!(transpose(&[]).is_empty());
    }
}
