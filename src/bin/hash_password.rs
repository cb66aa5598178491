use clinicdesk::services::auth::hash_password;

// Generates the bcrypt hash for ADMIN_PASSWORD_HASH.
fn main() {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            eprintln!("Usage: hash_password <password>");
            std::process::exit(1);
        }
    };

    match hash_password(&password) {
        Ok(hash) => println!("{}", hash),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
