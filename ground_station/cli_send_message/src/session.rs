/*
One run of the send_message tool: get the message, wrap it in a print command, POST it once
and tell the operator how it went. Nothing is retried; a failure ends the run with exit code 1.

Status lines go to `output` so tests can drive a whole run against a mock database.
*/

use crate::args::Args;
use crate::sender::{CommandSender, SendError};
use common::PrintCommand;
use log::{error, info};
use std::io::{BufRead, Write};
use std::time::Duration;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Run the tool once and return the process exit code.
pub async fn run<R: BufRead, W: Write>(args: &Args, input: &mut R, output: &mut W) -> i32 {
    match session(args, input, output).await {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FAILURE,
        Err(e) => {
            error!("Could not talk to the terminal: {}", e);
            EXIT_FAILURE
        }
    }
}

async fn session<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<bool> {
    writeln!(output, "Print_n_Prick - Send Message")?;
    writeln!(output, "{}", "=".repeat(40))?;

    let message = if args.message.is_empty() {
        prompt_for_message(input, output)?
    } else {
        args.message.join(" ")
    };

    if message.is_empty() {
        writeln!(output, "No message provided. Exiting.")?;
        return Ok(false);
    }

    writeln!(output, "\nSending message...")?;
    let sent = send_message(args, &message, output).await?;

    if sent {
        writeln!(output, "\nDone! Check your printer for the message.")?;
    } else {
        writeln!(output, "\nFailed to send message. Please try again.")?;
    }
    Ok(sent)
}

/// Ask for a message on `input`. End of input counts as an empty reply.
fn prompt_for_message<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> std::io::Result<String> {
    writeln!(output, "\nEnter your message (or press Ctrl+C to cancel):")?;
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Build and POST the print command, reporting the result. Ok(false) is a reported failure.
async fn send_message<W: Write>(args: &Args, message: &str, output: &mut W) -> std::io::Result<bool> {
    let command = match PrintCommand::new(message) {
        Ok(command) => command,
        Err(e) => {
            writeln!(output, "Error: {}", e)?;
            return Ok(false);
        }
    };

    let sender = match CommandSender::new(&args.database_url, Duration::from_secs(args.timeout_secs)) {
        Ok(sender) => sender,
        Err(e) => {
            error!("{}", e);
            writeln!(output, "Error: {}", e)?;
            return Ok(false);
        }
    };
    info!("Sending print command to {}", sender.url());

    match sender.send(&command).await {
        Ok(receipt) => {
            writeln!(output, "Message sent successfully!")?;
            writeln!(output, "   Message: \"{}\"", command.data)?;
            writeln!(
                output,
                "   Command ID: {}",
                receipt.command_id.as_deref().unwrap_or("N/A")
            )?;
            writeln!(output, "\nYour message will be printed with:")?;
            writeln!(output, "   - Your custom message")?;
            writeln!(output, "   - Today's weather (in Fahrenheit)")?;
            writeln!(output, "   - Hand sanitizer level")?;
            writeln!(output, "   - Date and time (12-hour format)")?;
            Ok(true)
        }
        Err(SendError::Rejected { status, body }) => {
            writeln!(output, "Error: Failed to send message (HTTP {})", status)?;
            writeln!(output, "   Response: {}", body)?;
            Ok(false)
        }
        Err(e) => {
            error!("Send failed: {}", e);
            writeln!(output, "Error: Connection failed")?;
            writeln!(output, "   {}", e)?;
            Ok(false)
        }
    }
}
