//! ensure serde is working as expected

use super::*;

#[test]
fn test_serde() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct MyTypes {
        calendar: CalendarValue,
        ambient: CalendarValue,
        date: UtcDateTime,
        raw_date: LittleEndian<UtcDateTime>,
    }

    let my_instance = MyTypes {
        calendar: CalendarValue::new(2023, 12, 31)
            .with_time(19, 0, 0)
            .with_fraction(0.25)
            .with_offset(-18_000),
        ambient: CalendarValue::new(1969, 7, 20).with_time(20, 17, 40),
        date: UtcDateTime::from_millis(1_704_067_200_000),
        raw_date: UtcDateTime::from_millis(-500).into(),
    };

    let dumped = serde_json::to_string(&my_instance).unwrap();
    let loaded: MyTypes = serde_json::from_str(&dumped).unwrap();
    assert_eq!(my_instance, loaded)
}
