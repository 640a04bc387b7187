use crate::{llvmop::Value, LlvmTemp};

pub fn unwrap_values(arr: Vec<&Value>) -> Vec<LlvmTemp> {
	arr.into_iter().flat_map(|v| v.unwrap_temp()).collect()
}

// replace `value` with `to` if it reads `temp`
pub fn replace_value(value: &mut Value, temp: &LlvmTemp, to: &Value) -> usize {
	match value {
		Value::Temp(t) if t == temp => {
			*value = to.clone();
			1
		}
		_ => 0,
	}
}

pub fn all_equal<T: PartialEq>(slice: &[T]) -> bool {
	slice.windows(2).all(|window| window[0] == window[1])
}
