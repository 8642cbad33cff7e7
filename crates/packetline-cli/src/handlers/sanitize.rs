use anyhow::Result;
use packetline_normalizer::sanitize_path;

pub fn handle(paths: &[String]) -> Result<()> {
    for path in paths {
        println!("{}", sanitize_path(path));
    }
    Ok(())
}
