//! Shell completion generation for paisano
//!
//! This module generates completion scripts for bash, zsh and fish. The
//! static part comes from clap; a hook appended to it completes target specs
//! by calling back into the hidden `__complete` subcommand, which prints one
//! `value<TAB>description[<TAB>nospace]` line per candidate and one
//! `<TAB>message` line per message.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, PaisanoError, Result};

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
/// * `bin` - Name the script registers completions for
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion(shell_name: &str, bin: &str) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    print!("{}", completion_script(shell, bin));
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(PaisanoError::Config(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{shell_name} (supported shells: bash, zsh, fish)"),
        })),
    }
}

fn completion_script(shell: Shell, bin: &str) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, bin, &mut buffer);
    let basic = String::from_utf8_lossy(&buffer);

    // clap_complete derives shell function names this way
    let func = bin.replace('-', "__");

    match shell {
        Shell::Zsh => zsh_hook(&basic, bin, &func),
        Shell::Fish => fish_hook(&basic, bin, &func),
        _ => bash_hook(&basic, bin, &func),
    }
}

/// Visible subcommand names, offered next to specs in the first position
fn subcommand_names() -> Vec<String> {
    CliArgs::command()
        .get_subcommands()
        .filter(|c| !c.is_hide_set())
        .map(|c| c.get_name().to_string())
        .collect()
}

/// Bash completion with dynamic target spec support
fn bash_hook(basic: &str, bin: &str, func: &str) -> String {
    let subcommands = subcommand_names().join(" ");

    format!(
        r#"{basic}

# Complete target specs from the completion cache
_{func}_specs() {{
    local cur="$1" line value rest
    local nospace=0
    local -a values=()
    while IFS= read -r line; do
        [[ -z "$line" ]] && continue
        value="${{line%%$'\t'*}}"
        rest="${{line#*$'\t'}}"
        if [[ -z "$value" ]]; then
            printf '\n%s' "$rest" >&2
            continue
        fi
        [[ "$rest" == *$'\t'nospace ]] && nospace=1
        values+=("$value")
    done < <({bin} __complete "$cur" 2>/dev/null)

    COMPREPLY+=("${{values[@]}}")
    if [[ $nospace -eq 1 ]]; then
        compopt -o nospace 2>/dev/null
    fi
}}

_{func}_enhanced() {{
    local cur prev words cword
    _init_completion -n ':=&' || return

    # The spec is the first word that is neither a flag nor a flag's value
    local i positional=0
    for (( i = 1; i < cword; i++ )); do
        case "${{words[i]}}" in
            --for|-c|--config) (( i++ )) ;;
            -*) ;;
            *) positional=1; break ;;
        esac
    done

    if [[ $positional -eq 0 && "$cur" != -* ]]; then
        COMPREPLY=($(compgen -W "{subcommands}" -- "$cur"))
        _{func}_specs "$cur"

        # Readline replaces only the text after the last ':', '=' or '&'
        local pre="${{cur%"${{cur##*[:=&]}}"}}"
        if [[ -n "$pre" ]]; then
            COMPREPLY=("${{COMPREPLY[@]#"$pre"}}")
        fi
        return 0
    fi

    _{func} "$@"
}}

complete -F _{func}_enhanced {bin}
"#
    )
}

/// Zsh completion with dynamic target spec support
fn zsh_hook(basic: &str, bin: &str, func: &str) -> String {
    format!(
        r#"{basic}

# Complete target specs from the completion cache
_{func}_specs() {{
    local line value rest
    local nospace=0
    local -a values displays
    for line in "${{(@f)$({bin} __complete "$PREFIX" 2>/dev/null)}}"; do
        [[ -z "$line" ]] && continue
        value="${{line%%$'\t'*}}"
        rest="${{line#*$'\t'}}"
        if [[ -z "$value" ]]; then
            _message -r "$rest"
            continue
        fi
        [[ "$rest" == *$'\t'nospace ]] && nospace=1
        values+=("$value")
        displays+=("$value  -- ${{rest%%$'\t'*}}")
    done

    (( ${{#values}} )) || return 1
    if (( nospace )); then
        compadd -Q -l -S '' -d displays -- "${{values[@]}}"
    else
        compadd -Q -l -d displays -- "${{values[@]}}"
    fi
}}

_{func}_enhanced() {{
    if (( CURRENT == 2 )) && [[ "$PREFIX" != -* ]]; then
        _{func}_specs
    fi
    _{func} "$@"
}}

compdef _{func}_enhanced {bin}
"#
    )
}

/// Fish completion with dynamic target spec support
///
/// Fish reads `value<TAB>description` natively; messages have nowhere to go.
fn fish_hook(basic: &str, bin: &str, func: &str) -> String {
    format!(
        r#"{basic}

# Complete target specs from the completion cache
function __{func}_specs
    {bin} __complete (commandline -ct) 2>/dev/null | string match -rv '^\t' | string replace -r '\tnospace$' ''
end

complete -c {bin} -n '__fish_use_subcommand' -f -a '(__{func}_specs)'
"#
    )
}
