use rlprobe::entry;
use rlprobe::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
