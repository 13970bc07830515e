use crate::Tag;

mod ser;
mod stream;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(Tag::$tag), $val);
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        LongArray = 12,
    }

    for value in 0..=u8::MAX {
        match Tag::try_from(value) {
            Ok(tag) => assert_eq!(u8::from(tag), value),
            Err(()) => assert!(value > 12),
        }
    }
}
