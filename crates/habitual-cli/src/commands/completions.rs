use clap_complete::{generate, Shell};

pub fn run(shell: Shell, mut cmd: clap::Command) -> Result<(), Box<dyn std::error::Error>> {
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
