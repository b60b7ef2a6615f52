#[cfg(target_arch = "wasm32")]
fn main() {
    wordcards::web::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("wordcards runs in the browser; build it with `trunk serve`.");
    eprintln!("The word list server is `cargo run --features server --bin word_server`.");
}
