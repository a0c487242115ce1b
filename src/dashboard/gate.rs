// The access gate. A shared password, not a security boundary.

use crate::dashboard::*;

pub const DEFAULT_SECRET: &str = "seplan123";

pub fn prompt_password<R: BufRead>(mut input: R) -> DashResult<String> {
    eprint!("Digite a senha para acessar: ");
    let mut line = String::new();
    input.read_line(&mut line).context(ReadingInputSnafu {})?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Stops everything unless the password matches.
pub fn check_access(secret: &str, entered: &str) -> DashResult<()> {
    if entered == secret {
        return Ok(());
    }
    if entered.is_empty() {
        debug!("check_access: no password");
        MissingPasswordSnafu {}.fail()
    } else {
        warn!("check_access: wrong password");
        WrongPasswordSnafu {}.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_secret() {
        assert!(check_access(DEFAULT_SECRET, "seplan123").is_ok());
    }

    #[test]
    fn rejects_wrong_and_empty() {
        let err = check_access(DEFAULT_SECRET, "seplan").unwrap_err();
        assert!(matches!(err, DashError::WrongPassword {}));
        assert_eq!(err.to_string(), "Senha incorreta.");
        let err = check_access(DEFAULT_SECRET, "").unwrap_err();
        assert!(matches!(err, DashError::MissingPassword {}));
    }

    #[test]
    fn prompt_strips_newline() {
        let p = prompt_password("seplan123\r\n".as_bytes()).unwrap();
        assert_eq!(p, "seplan123");
        assert!(check_access(DEFAULT_SECRET, &p).is_ok());
        assert_eq!(prompt_password("".as_bytes()).unwrap(), "");
    }
}
