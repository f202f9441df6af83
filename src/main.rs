mod entry;
mod system;

use flowramp::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
