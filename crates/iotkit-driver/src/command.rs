//! Typed commands for the host's command-dispatch registry.
//!
//! Hosts invoke commands by name with positional JSON arguments, in the
//! same order as the matching [`IotDriver`](crate::IotDriver) method.

use iotkit_adapter::ClientError;
use serde_json::Value;

/// Every command name the driver exposes.
pub const COMMANDS: &[&str] = &[
    "getAccountInfo",
    "getActivationCode",
    "refreshActivationCode",
    "listDevices",
    "getDevice",
    "createDevice",
    "updateDevice",
    "activateDevice",
    "deleteDevice",
    "addComponent",
    "removeComponent",
    "listAllTags",
    "listAllAttributes",
    "listAllComponentTypes",
    "getComponentType",
    "createComponentType",
    "updateComponentType",
    "submitData",
    "retrieveData",
];

/// One invocation of a driver operation with its arguments.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Command {
    GetAccountInfo {
        account_id: String,
    },
    GetActivationCode {
        account_id: String,
    },
    RefreshActivationCode {
        account_id: String,
    },
    ListDevices {
        account_id: String,
        filters: Option<Value>,
    },
    GetDevice {
        account_id: String,
        device_id: String,
    },
    CreateDevice {
        account_id: String,
        device: Value,
    },
    UpdateDevice {
        account_id: String,
        device_id: String,
        device: Value,
    },
    ActivateDevice {
        account_id: String,
        device_id: String,
        activation_code: String,
    },
    DeleteDevice {
        account_id: String,
        device_id: String,
    },
    AddComponent {
        account_id: String,
        device_id: String,
        device_token: String,
        component: Value,
    },
    RemoveComponent {
        account_id: String,
        device_id: String,
        component_id: String,
    },
    ListAllTags {
        account_id: String,
    },
    ListAllAttributes {
        account_id: String,
    },
    ListAllComponentTypes {
        account_id: String,
    },
    GetComponentType {
        account_id: String,
        component_id: String,
    },
    CreateComponentType {
        account_id: String,
        component: Value,
    },
    UpdateComponentType {
        account_id: String,
        component_id: String,
        component: Value,
    },
    SubmitData {
        account_id: String,
        device_id: String,
        device_token: String,
        data: Value,
    },
    RetrieveData {
        account_id: String,
        search: Value,
    },
}

impl Command {
    /// Registry name of the command.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAccountInfo { .. } => "getAccountInfo",
            Self::GetActivationCode { .. } => "getActivationCode",
            Self::RefreshActivationCode { .. } => "refreshActivationCode",
            Self::ListDevices { .. } => "listDevices",
            Self::GetDevice { .. } => "getDevice",
            Self::CreateDevice { .. } => "createDevice",
            Self::UpdateDevice { .. } => "updateDevice",
            Self::ActivateDevice { .. } => "activateDevice",
            Self::DeleteDevice { .. } => "deleteDevice",
            Self::AddComponent { .. } => "addComponent",
            Self::RemoveComponent { .. } => "removeComponent",
            Self::ListAllTags { .. } => "listAllTags",
            Self::ListAllAttributes { .. } => "listAllAttributes",
            Self::ListAllComponentTypes { .. } => "listAllComponentTypes",
            Self::GetComponentType { .. } => "getComponentType",
            Self::CreateComponentType { .. } => "createComponentType",
            Self::UpdateComponentType { .. } => "updateComponentType",
            Self::SubmitData { .. } => "submitData",
            Self::RetrieveData { .. } => "retrieveData",
        }
    }

    /// Build a command from its registry name and positional arguments.
    ///
    /// # Errors
    ///
    /// Returns error if the name is unknown, a required argument is missing,
    /// an identifier is an object, array or null, or too many arguments are
    /// given. Numeric and boolean identifiers are used in their text form.
    pub fn parse(name: &str, args: &[Value]) -> Result<Self, CommandError> {
        let command = COMMANDS
            .iter()
            .copied()
            .find(|c| *c == name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        let mut args = Args::new(command, args);

        let parsed = match command {
            "getAccountInfo" => Self::GetAccountInfo {
                account_id: args.string("accountId")?,
            },
            "getActivationCode" => Self::GetActivationCode {
                account_id: args.string("accountId")?,
            },
            "refreshActivationCode" => Self::RefreshActivationCode {
                account_id: args.string("accountId")?,
            },
            "listDevices" => Self::ListDevices {
                account_id: args.string("accountId")?,
                filters: args.optional(),
            },
            "getDevice" => Self::GetDevice {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
            },
            "createDevice" => Self::CreateDevice {
                account_id: args.string("accountId")?,
                device: args.value("device")?,
            },
            "updateDevice" => Self::UpdateDevice {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
                device: args.value("device")?,
            },
            "activateDevice" => Self::ActivateDevice {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
                activation_code: args.string("activationCode")?,
            },
            "deleteDevice" => Self::DeleteDevice {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
            },
            "addComponent" => Self::AddComponent {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
                device_token: args.string("deviceToken")?,
                component: args.value("component")?,
            },
            "removeComponent" => Self::RemoveComponent {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
                component_id: args.string("componentId")?,
            },
            "listAllTags" => Self::ListAllTags {
                account_id: args.string("accountId")?,
            },
            "listAllAttributes" => Self::ListAllAttributes {
                account_id: args.string("accountId")?,
            },
            "listAllComponentTypes" => Self::ListAllComponentTypes {
                account_id: args.string("accountId")?,
            },
            "getComponentType" => Self::GetComponentType {
                account_id: args.string("accountId")?,
                component_id: args.string("componentId")?,
            },
            "createComponentType" => Self::CreateComponentType {
                account_id: args.string("accountId")?,
                component: args.value("component")?,
            },
            "updateComponentType" => Self::UpdateComponentType {
                account_id: args.string("accountId")?,
                component_id: args.string("componentId")?,
                component: args.value("component")?,
            },
            "submitData" => Self::SubmitData {
                account_id: args.string("accountId")?,
                device_id: args.string("deviceId")?,
                device_token: args.string("deviceToken")?,
                data: args.value("data")?,
            },
            "retrieveData" => Self::RetrieveData {
                account_id: args.string("accountId")?,
                search: args.value("search")?,
            },
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        args.finish()?;
        Ok(parsed)
    }
}

/// Cursor over positional arguments.
struct Args<'a> {
    command: &'static str,
    values: &'a [Value],
    next: usize,
}

impl<'a> Args<'a> {
    fn new(command: &'static str, values: &'a [Value]) -> Self {
        Self {
            command,
            values,
            next: 0,
        }
    }

    fn take(&mut self) -> Option<&'a Value> {
        let value = self.values.get(self.next);
        self.next += 1;
        value
    }

    fn value(&mut self, argument: &'static str) -> Result<Value, CommandError> {
        self.take()
            .cloned()
            .ok_or(CommandError::MissingArgument {
                command: self.command,
                argument,
            })
    }

    fn string(&mut self, argument: &'static str) -> Result<String, CommandError> {
        match self.value(argument)? {
            Value::String(s) => Ok(s),
            scalar @ (Value::Number(_) | Value::Bool(_)) => Ok(scalar.to_string()),
            _ => Err(CommandError::InvalidArgument {
                command: self.command,
                argument,
                expected: "string or number",
            }),
        }
    }

    fn optional(&mut self) -> Option<Value> {
        self.take().filter(|v| !v.is_null()).cloned()
    }

    fn finish(self) -> Result<(), CommandError> {
        if self.values.len() > self.next {
            return Err(CommandError::TooManyArguments {
                command: self.command,
                expected: self.next,
                given: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Errors that can occur invoking a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// No command with this name
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A required positional argument was not supplied
    #[error("{command}: missing argument {argument}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Argument name
        argument: &'static str,
    },
    /// An argument has the wrong JSON type
    #[error("{command}: argument {argument} must be a {expected}")]
    InvalidArgument {
        /// Command name
        command: &'static str,
        /// Argument name
        argument: &'static str,
        /// Expected JSON type
        expected: &'static str,
    },
    /// More positional arguments than the command takes
    #[error("{command}: expected at most {expected} arguments, got {given}")]
    TooManyArguments {
        /// Command name
        command: &'static str,
        /// Number of arguments the command takes
        expected: usize,
        /// Number of arguments supplied
        given: usize,
    },
    /// The forwarded request failed
    #[error(transparent)]
    Client(#[from] ClientError),
}
