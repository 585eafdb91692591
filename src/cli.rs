//! Command-line parsing.

use vendcast_forecast::{LocationType, MachineInput};

pub const USAGE: &str = "\
Usage:
  vendcast [dashboard]
  vendcast machines
  vendcast add <name> <type> <sales> <margin> <rent> <electric>
  vendcast update <id> <name> <type> <sales> <margin> <rent> <electric>
  vendcast remove <id>

<type> is SCHOOL, SHOPPING_MALL or HOSPITAL.
<margin> is a fraction (0.42) unless machines.margin_unit = \"percent\".";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dashboard,
    Machines,
    Add(MachineInput),
    Update { id: String, input: MachineInput },
    Remove { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected} arguments, got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{field} must be a number, got `{value}`")]
    NotANumber { field: &'static str, value: String },
    #[error(transparent)]
    LocationType(#[from] vendcast_forecast::ParseLocationTypeError),
}

impl Command {
    /// Parse arguments after the program name
    pub fn parse<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let Some((command, rest)) = args.split_first() else {
            return Ok(Command::Dashboard);
        };

        match command.as_str() {
            "dashboard" => expect_arity("dashboard", rest, 0).map(|_| Command::Dashboard),
            "machines" => expect_arity("machines", rest, 0).map(|_| Command::Machines),
            "add" => {
                expect_arity("add", rest, 6)?;
                Ok(Command::Add(parse_input(rest)?))
            }
            "update" => {
                expect_arity("update", rest, 7)?;
                Ok(Command::Update {
                    id: rest[0].clone(),
                    input: parse_input(&rest[1..])?,
                })
            }
            "remove" => {
                expect_arity("remove", rest, 1)?;
                Ok(Command::Remove { id: rest[0].clone() })
            }
            other => Err(UsageError::UnknownCommand(other.to_string())),
        }
    }
}

fn expect_arity(command: &'static str, rest: &[String], expected: usize) -> Result<(), UsageError> {
    if rest.len() == expected {
        Ok(())
    } else {
        Err(UsageError::WrongArity {
            command,
            expected,
            got: rest.len(),
        })
    }
}

/// `<name> <type> <sales> <margin> <rent> <electric>`; ranges are checked later
fn parse_input(fields: &[String]) -> Result<MachineInput, UsageError> {
    Ok(MachineInput {
        name: fields[0].clone(),
        location_type: fields[1].parse::<LocationType>()?,
        expected_sales_per_day: parse_number("sales", &fields[2])?,
        average_profit_margin_percentage: parse_number("margin", &fields[3])?,
        rent_cost_per_day: parse_number("rent", &fields[4])?,
        electric_cost_per_temp_per_day: parse_number("electric", &fields[5])?,
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, UsageError> {
    value.trim().parse::<f64>().map_err(|_| UsageError::NotANumber {
        field,
        value: value.to_string(),
    })
}
