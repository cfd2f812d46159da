use raw_array::RawArray;

fn main() {
    println!("--- Growth Example ---");
    let mut arr = RawArray::new();

    for i in 1..=5 {
        if arr.spare() == 0 {
            arr.try_grow().expect("allocation failed");
        }
        let _ = arr.push_within_capacity(i * 10);
        println!("Pushed: {}, len: {}, cap: {}", i * 10, arr.len(), arr.capacity());
    }

    println!("Elements: {:?}", &arr[..]);

    arr.remove_range_with(1, 3, |x| println!("Removed: {}", x));
    arr.try_shrink_to_fit().expect("allocation failed");
    println!("After trim: {:?}, cap: {}", arr, arr.capacity());
}
