use biglist::{BigList, BigListConfig, profiling};

fn main() -> biglist::Result<()> {
    let config = BigListConfig::new(2, 2)?;
    let mut list = BigList::with_config(config);
    for i in 0..20u32 {
        list.add(i)?;
    }
    println!("{list:?} (depth {})", list.depth());

    list.reverse_range(3usize, 12usize)?;
    list.copy_within(0usize, 10usize, 5usize)?;
    println!("{list:?}");

    let middle = list.get_range(5usize, 10usize)?;
    list.insert_range(0usize, &middle)?;
    println!("{list:?} (length {}, capacity {})", list.len(), list.capacity());
    if let Some(index) = list.index_of(&7) {
        println!("first 7 at {index}");
    }

    println!("{}", profiling::report());
    return Ok(());
}
