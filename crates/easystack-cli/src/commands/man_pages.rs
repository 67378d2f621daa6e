use super::EXIT_SUCCESS;
use clap::{Command, CommandFactory};
use std::path::{Path, PathBuf};

pub fn run<C: CommandFactory>(dir: &Path) -> Result<u8, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create dir: {e}"))?;
    let cmd = C::command();
    let bin_name = cmd.get_name().to_owned();

    let mut written = vec![write_page(dir, &bin_name, cmd.clone())?];
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let page = format!("{bin_name}-{}", sub.get_name());
        written.push(write_page(dir, &page, sub.clone())?);
    }
    println!("wrote {} man page(s) to {}", written.len(), dir.display());
    Ok(EXIT_SUCCESS)
}

fn write_page(dir: &Path, name: &str, cmd: Command) -> Result<PathBuf, String> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .map_err(|e| format!("man page render failed for {name}: {e}"))?;
    let path = dir.join(format!("{name}.1"));
    std::fs::write(&path, &buf).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(path)
}
