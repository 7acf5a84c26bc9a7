//! Row models: statically declared columns and their conversion to and from transfer maps.

mod adapter;
mod descriptor;
mod value;

pub use adapter::{take_field, TransferMap};
pub use descriptor::{ColumnDescriptor, ModelDescriptor, MODIFIER_SEPARATOR};
pub use value::{ColumnKind, ColumnValue};

use crate::error::AppError;
use crate::sql::SqlValue;
use sqlx::any::AnyRow;

/// Declaration of one persisted column. `key` is the name used in JSON bodies and filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub key: &'static str,
    pub kind: ColumnKind,
}

/// A declared table whose rows are exchanged as transfer maps.
///
/// Implemented by [`row_model!`](crate::row_model). Every field is optional so an instance can
/// represent both a full row and a partial creation request.
pub trait RowModel: Sized + Send + Sync + 'static {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str;
    const COLUMNS: &'static [ColumnDef];

    /// One entry per column of [`Self::COLUMNS`], in the same order; `None` for unset fields.
    fn column_values(&self) -> Vec<Option<SqlValue>>;

    /// Set columns only, keyed by their JSON key.
    fn to_map(&self) -> TransferMap;

    /// Assign every declared column present in `map`. Unknown keys are ignored, missing ones stay unset.
    fn from_map(map: &TransferMap) -> Result<Self, AppError>;

    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error>;
}

/// Declares a row model struct and implements [`RowModel`] for it.
///
/// ```
/// rowrest::row_model! {
///     /// Rows of the `test` table.
///     pub struct NTest {
///         table = "test",
///         primary_key = uid,
///         uid: i64,
///         value: i64,
///         string_attr: String as "stringAttr",
///     }
/// }
///
/// let row = NTest { uid: Some(1), value: Some(2), string_attr: None };
/// assert_eq!(rowrest::RowModel::to_map(&row).len(), 2);
/// ```
#[macro_export]
macro_rules! row_model {
    (@key $field:ident) => {
        stringify!($field)
    };
    (@key $field:ident $json:literal) => {
        $json
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            table = $table:literal,
            primary_key = $pk:ident,
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty $(as $json:literal)? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: ::core::option::Option<$ty>, )+
        }

        impl $crate::RowModel for $name {
            const TABLE: &'static str = $table;
            const PRIMARY_KEY: &'static str = stringify!($pk);
            const COLUMNS: &'static [$crate::ColumnDef] = &[
                $(
                    $crate::ColumnDef {
                        name: stringify!($field),
                        key: $crate::row_model!(@key $field $($json)?),
                        kind: <$ty as $crate::ColumnValue>::KIND,
                    },
                )+
            ];

            fn column_values(&self) -> ::std::vec::Vec<::core::option::Option<$crate::SqlValue>> {
                ::std::vec![ $( self.$field.as_ref().map($crate::ColumnValue::to_sql), )+ ]
            }

            fn to_map(&self) -> $crate::TransferMap {
                let mut map = $crate::TransferMap::new();
                $(
                    if let ::core::option::Option::Some(v) = &self.$field {
                        map.insert(
                            ::std::string::String::from($crate::row_model!(@key $field $($json)?)),
                            $crate::ColumnValue::to_json(v),
                        );
                    }
                )+
                map
            }

            fn from_map(
                map: &$crate::TransferMap,
            ) -> ::core::result::Result<Self, $crate::AppError> {
                ::core::result::Result::Ok(Self {
                    $(
                        $field: $crate::model::take_field::<$ty>(
                            map,
                            $crate::row_model!(@key $field $($json)?),
                        )?,
                    )+
                })
            }

            fn from_row(
                row: &$crate::AnyRow,
            ) -> ::core::result::Result<Self, $crate::sqlx::Error> {
                ::core::result::Result::Ok(Self {
                    $( $field: <$ty as $crate::ColumnValue>::decode(row, stringify!($field))?, )+
                })
            }
        }
    };
}
