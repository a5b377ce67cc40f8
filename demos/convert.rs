use twee_json::{convert_twee3, serialize_json};


pub fn main() {
    let (doc, warnings) = convert_twee3(include_str!("../test-data/Night Courier.twee"));
    for w in warnings {
        eprintln!("Warning: {:?}", w);
    }
    println!("{}", serialize_json(&doc));
}
