/// Implement [`Reflect`](crate::Reflect) for a struct by listing its fields.
///
/// Fields are compared in the listed order. Each field may carry tag
/// annotations in brackets, which the comparison consults when
/// [`Config::observe_field_tag`](crate::Config::observe_field_tag) names the tag.
///
/// ```
/// use deep_compare::{reflect_struct, Config};
///
/// struct Account {
///     id: u64,
///     secret: String,
///     updated_at: String,
/// }
///
/// reflect_struct!(Account {
///     id,
///     secret [cmp = "-"],
///     updated_at [cmp = "+"],
/// });
///
/// let config = Config::new().with_field_tag("cmp");
/// let got = Account { id: 1, secret: "a".into(), updated_at: "monday".into() };
/// let want = Account { id: 1, secret: "b".into(), updated_at: "friday".into() };
/// assert!(config.equal(&got, &want));
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($ty:ty { $($field:tt $([$($tag:ident = $value:literal),* $(,)?])?),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn view(&self) -> $crate::View<'_> {
                $crate::View::Struct(
                    $crate::Record::new()
                        $(.tagged_field(
                            stringify!($field),
                            &self.$field,
                            &[$($((stringify!($tag), $value)),*)?],
                        ))*
                )
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Reflect, View};

    struct Point {
        x: i32,
        y: i32,
    }

    crate::reflect_struct!(Point { x, y [cmp = "-"] });

    struct Pair(u8, &'static str);

    crate::reflect_struct!(Pair { 0, 1 });

    #[test]
    fn test_fields_in_declared_order() {
        let point = Point { x: 1, y: 2 };
        let View::Struct(record) = point.view() else {
            panic!("expected struct view");
        };
        let names: Vec<_> = record.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(record.fields()[0].tag("cmp"), None);
        assert_eq!(record.fields()[1].tag("cmp"), Some("-"));
    }

    #[test]
    fn test_tuple_struct_fields() {
        let pair = Pair(7, "seven");
        let View::Struct(record) = pair.view() else {
            panic!("expected struct view");
        };
        let names: Vec<_> = record.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["0", "1"]);
    }
}
